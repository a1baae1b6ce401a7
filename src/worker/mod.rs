//! Summary orchestration and the Lambda entrypoint

pub mod handler;
pub mod summarize;

// Re-export the main handler for convenience
pub use handler::{AppState, function_handler as handler};
pub use summarize::{SummaryOrchestrator, SummaryOutcome};
