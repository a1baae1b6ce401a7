//! Summary orchestration with per-claim in-flight deduplication.
//!
//! Each claim id moves through `Fetching -> Composing -> Invoking -> Parsing`
//! and settles as `Done` or `Failed`. While an invocation is pending, further
//! requests for the same claim attach to it and receive the same outcome.
//! The pipeline runs on its own task, so callers that give up waiting do not
//! cancel it for the others.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

use crate::adapters::NoteSource;
use crate::ai::{ModelInvoker, parse};
use crate::core::models::SummaryResult;
use crate::errors::SummaryError;
use crate::prompt::compose;

pub type SummaryOutcome = Result<SummaryResult, SummaryError>;

type SharedOutcome = Shared<BoxFuture<'static, SummaryOutcome>>;
type InFlightTable = Arc<Mutex<HashMap<String, SharedOutcome>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Composing,
    Invoking,
    Parsing,
    Done,
    Failed,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fetching => "fetching",
            Self::Composing => "composing",
            Self::Invoking => "invoking",
            Self::Parsing => "parsing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

fn lock(
    table: &Mutex<HashMap<String, SharedOutcome>>,
) -> MutexGuard<'_, HashMap<String, SharedOutcome>> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clears the in-flight entry when the pipeline task ends, including by panic.
struct InFlightGuard {
    table: InFlightTable,
    claim_id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.table).remove(&self.claim_id);
    }
}

/// Coordinates note retrieval, prompt composition, model invocation and
/// response parsing for one claim at a time per id.
pub struct SummaryOrchestrator {
    notes: Arc<dyn NoteSource>,
    model: Arc<dyn ModelInvoker>,
    in_flight: InFlightTable,
}

impl SummaryOrchestrator {
    #[must_use]
    pub fn new(notes: Arc<dyn NoteSource>, model: Arc<dyn ModelInvoker>) -> Self {
        Self {
            notes,
            model,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of claims with a pending invocation.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        lock(&self.in_flight).len()
    }

    #[must_use]
    pub fn is_in_flight(&self, claim_id: &str) -> bool {
        lock(&self.in_flight).contains_key(claim_id)
    }

    /// Produces the summary for `claim_id`, sharing any invocation already
    /// pending for the same claim.
    ///
    /// # Errors
    ///
    /// Returns the failure kind of the settled invocation; see [`SummaryError`].
    #[tracing::instrument(level = "info", skip(self))]
    pub async fn summarize(&self, claim_id: &str) -> SummaryOutcome {
        if claim_id.trim().is_empty() {
            return Err(SummaryError::NotFound(claim_id.to_string()));
        }
        self.join_or_start(claim_id).await
    }

    fn join_or_start(&self, claim_id: &str) -> SharedOutcome {
        let mut table = lock(&self.in_flight);

        if let Some(pending) = table.get(claim_id) {
            info!(claim_id, "Attaching to in-flight summary");
            return pending.clone();
        }

        let invocation_id = Uuid::new_v4();
        let span = info_span!("summary_invocation", claim_id, %invocation_id);
        let guard = InFlightGuard {
            table: Arc::clone(&self.in_flight),
            claim_id: claim_id.to_string(),
        };
        let notes = Arc::clone(&self.notes);
        let model = Arc::clone(&self.model);

        // The guard can only take the lock after this function releases it,
        // so the entry is always inserted before it is removed.
        let task = tokio::spawn(
            async move {
                let outcome =
                    run_pipeline(notes.as_ref(), model.as_ref(), &guard.claim_id).await;
                match &outcome {
                    Ok(_) => info!(stage = Stage::Done.as_str(), "Summary generated"),
                    Err(e) => error!(
                        stage = Stage::Failed.as_str(),
                        kind = e.kind().as_str(),
                        "Summary failed: {}",
                        e
                    ),
                }
                drop(guard);
                outcome
            }
            .instrument(span),
        );

        let shared = async move { task.await.unwrap_or_else(|e| Err(e.into())) }
            .boxed()
            .shared();
        table.insert(claim_id.to_string(), shared.clone());
        shared
    }
}

async fn run_pipeline(
    notes: &dyn NoteSource,
    model: &dyn ModelInvoker,
    claim_id: &str,
) -> SummaryOutcome {
    debug!(stage = Stage::Fetching.as_str());
    let claim_notes = notes.fetch_notes(claim_id).await?;

    debug!(stage = Stage::Composing.as_str(), notes_len = claim_notes.text.len());
    let request = compose(&claim_notes);

    debug!(stage = Stage::Invoking.as_str());
    let raw = model.invoke(&request).await?;

    debug!(stage = Stage::Parsing.as_str(), raw_len = raw.len());
    parse(claim_id, &raw)
}
