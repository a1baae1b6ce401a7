//! ClaimSum - structured, multi-facet summaries of insurance claim notes.
//!
//! Given a claim id, the crate fetches the claim's free-text notes, asks a
//! generative model for four summaries in a single call (overall,
//! customer-facing, adjuster-facing, next step), and validates the model's
//! JSON before handing back a [`core::models::SummaryResult`].
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda for serverless execution
//! - S3 for claim notes and DynamoDB for claim records (or JSON fixtures)
//! - Amazon Bedrock for the generative model
//! - Tokio for async runtime, with per-claim in-flight deduplication
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use claimsum::adapters::FixtureNoteSource;
//! use claimsum::ai::BedrockInvoker;
//! use claimsum::worker::SummaryOrchestrator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     claimsum::setup_logging();
//!
//!     let shared = aws_config::from_env().load().await;
//!     let notes = FixtureNoteSource::from_file("mocks/notes.json".as_ref())?;
//!     let model = BedrockInvoker::new(
//!         aws_sdk_bedrockruntime::Client::new(&shared),
//!         "anthropic.claude-3-sonnet-20240229-v1:0".to_string(),
//!     );
//!
//!     let orchestrator = SummaryOrchestrator::new(Arc::new(notes), Arc::new(model));
//!     let summary = orchestrator.summarize("CLM-1001").await?;
//!     println!("Next step: {}", summary.next_step);
//!
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod adapters;
pub mod ai;
pub mod core;
pub mod errors;
pub mod prompt;
pub mod worker;

pub use errors::{ErrorKind, SummaryError};

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Output is filtered by `RUST_LOG` (default `info`). Calling this more than
/// once is harmless; later calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// claimsum::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
