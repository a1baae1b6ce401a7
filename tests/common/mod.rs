#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use claimsum::adapters::{FixtureNoteSource, NoteSource};
use claimsum::ai::ModelInvoker;
use claimsum::core::models::{ClaimNotes, SummaryRequest};
use claimsum::errors::SummaryError;
use tokio::sync::Notify;

pub const VALID_OUTPUT: &str =
    r#"{"overall":"a","customer":"b","adjuster":"c","nextStep":"d"}"#;

pub fn fixture_notes(entries: &[(&str, &str)]) -> Arc<FixtureNoteSource> {
    let notes: HashMap<String, String> = entries
        .iter()
        .map(|(id, text)| ((*id).to_string(), (*text).to_string()))
        .collect();
    Arc::new(FixtureNoteSource::new(notes))
}

/// Model double that returns a fixed reply and counts calls.
pub struct CannedModel {
    reply: Result<String, SummaryError>,
    calls: AtomicUsize,
}

impl CannedModel {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(err: SummaryError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelInvoker for CannedModel {
    async fn invoke(&self, _request: &SummaryRequest) -> Result<String, SummaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.reply.clone()
    }
}

/// Model double that holds calls for gated claims until released.
pub struct GatedModel {
    gated_claim: String,
    gate: Notify,
    calls: AtomicUsize,
}

impl GatedModel {
    pub fn gating(claim_id: &str) -> Arc<Self> {
        Arc::new(Self {
            gated_claim: claim_id.to_string(),
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelInvoker for GatedModel {
    async fn invoke(&self, request: &SummaryRequest) -> Result<String, SummaryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.claim_id == self.gated_claim {
            self.gate.notified().await;
        }
        Ok(VALID_OUTPUT.to_string())
    }
}

/// Note source double whose every read fails.
pub struct BrokenNotes;

#[async_trait]
impl NoteSource for BrokenNotes {
    async fn fetch_notes(&self, _claim_id: &str) -> Result<ClaimNotes, SummaryError> {
        Err(SummaryError::StoreUnavailable("connection reset".to_string()))
    }
}

/// Note source whose read panics, standing in for a bug inside an adapter.
pub struct PanickingNotes;

#[async_trait]
impl NoteSource for PanickingNotes {
    async fn fetch_notes(&self, claim_id: &str) -> Result<ClaimNotes, SummaryError> {
        panic!("note adapter crashed for {claim_id}");
    }
}
