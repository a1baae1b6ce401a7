//! Note Source adapters: fixture-backed and S3-backed.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use serde::Deserialize;
use tracing::{debug, info};

use crate::core::models::ClaimNotes;
use crate::errors::SummaryError;

/// Retrieves raw note text for a claim.
///
/// A missing record and a record with empty text both yield
/// [`SummaryError::NotFound`]; read failures yield
/// [`SummaryError::StoreUnavailable`].
#[async_trait]
pub trait NoteSource: Send + Sync {
    async fn fetch_notes(&self, claim_id: &str) -> Result<ClaimNotes, SummaryError>;
}

fn into_notes(claim_id: &str, text: Option<String>) -> Result<ClaimNotes, SummaryError> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(ClaimNotes {
            claim_id: claim_id.to_string(),
            text,
        }),
        _ => Err(SummaryError::NotFound(claim_id.to_string())),
    }
}

#[derive(Debug, Deserialize)]
struct NoteFixture {
    id: String,
    #[serde(default)]
    notes: Option<String>,
}

/// Notes held in memory, usually loaded from `notes.json`.
#[derive(Debug, Default, Clone)]
pub struct FixtureNoteSource {
    notes: HashMap<String, String>,
}

impl FixtureNoteSource {
    #[must_use]
    pub fn new(notes: HashMap<String, String>) -> Self {
        Self { notes }
    }

    /// Parses a `[{ "id": ..., "notes": ... }]` document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a list of note entries.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let entries: Vec<NoteFixture> =
            serde_json::from_str(json).context("notes fixture is not a list of note entries")?;
        let notes = entries
            .into_iter()
            .filter_map(|entry| entry.notes.map(|text| (entry.id, text)))
            .collect();
        Ok(Self { notes })
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading notes fixture {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing {}", path.display()))
    }
}

#[async_trait]
impl NoteSource for FixtureNoteSource {
    async fn fetch_notes(&self, claim_id: &str) -> Result<ClaimNotes, SummaryError> {
        debug!(claim_id, "Reading notes from fixture");
        into_notes(claim_id, self.notes.get(claim_id).cloned())
    }
}

/// Notes stored as `<claimId>.txt` objects in an S3 bucket.
pub struct S3NoteSource {
    client: S3Client,
    bucket: String,
}

impl S3NoteSource {
    #[must_use]
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    #[must_use]
    pub fn object_key(claim_id: &str) -> String {
        format!("{claim_id}.txt")
    }
}

#[async_trait]
impl NoteSource for S3NoteSource {
    async fn fetch_notes(&self, claim_id: &str) -> Result<ClaimNotes, SummaryError> {
        let key = Self::object_key(claim_id);

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| map_get_object_error(claim_id, &self.bucket, &key, &e))?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| SummaryError::StoreUnavailable(format!("s3 body read {key}: {e}")))?
            .into_bytes();

        let notes = notes_from_object(claim_id, &key, &bytes)?;
        debug!(claim_id, notes_len = notes.text.len(), "Fetched notes from S3");
        Ok(notes)
    }
}

/// A missing object means the claim has no notes; anything else is a store failure.
pub fn map_get_object_error<R>(
    claim_id: &str,
    bucket: &str,
    key: &str,
    error: &SdkError<GetObjectError, R>,
) -> SummaryError {
    if matches!(error.as_service_error(), Some(GetObjectError::NoSuchKey(_))) {
        info!(claim_id, bucket, "No notes object for claim");
        return SummaryError::NotFound(claim_id.to_string());
    }
    SummaryError::StoreUnavailable(format!("s3 get_object {bucket}/{key}: {error}"))
}

/// Decodes a notes object body; an empty body counts as no notes.
pub fn notes_from_object(
    claim_id: &str,
    key: &str,
    bytes: &[u8],
) -> Result<ClaimNotes, SummaryError> {
    let text = String::from_utf8(bytes.to_vec()).map_err(|e| {
        SummaryError::StoreUnavailable(format!("notes object {key} is not UTF-8: {e}"))
    })?;
    into_notes(claim_id, Some(text))
}
