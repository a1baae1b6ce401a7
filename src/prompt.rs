//! Prompt composition for the multi-facet claim summary.
//!
//! All four summaries are requested in a single model call. Each instruction
//! embeds the note text verbatim; nothing else is interpolated, so the same
//! notes always produce the same request.

use serde_json::json;

use crate::core::models::{ClaimNotes, SummaryInstructions, SummaryRequest};

/// Keys the model must return, in the order they are requested.
pub const SUMMARY_KEYS: [&str; 4] = ["overall", "customer", "adjuster", "nextStep"];

pub const OVERALL_INSTRUCTION: &str = "Summarize the following claim notes in 5 bullet points.";
pub const CUSTOMER_INSTRUCTION: &str =
    "Write a customer-facing summary using empathetic tone (2-4 sentences).";
pub const ADJUSTER_INSTRUCTION: &str =
    "Provide an adjuster-focused summary highlighting risks and missing info.";
pub const NEXT_STEP_INSTRUCTION: &str = "Suggest the next best action in one sentence.";

fn with_notes(instruction: &str, notes: &str) -> String {
    format!("{instruction} Notes: {notes}")
}

/// Builds the summary request for a set of notes.
#[must_use]
pub fn compose(notes: &ClaimNotes) -> SummaryRequest {
    let text = notes.text.as_str();
    SummaryRequest {
        claim_id: notes.claim_id.clone(),
        instructions: SummaryInstructions {
            overall: with_notes(OVERALL_INSTRUCTION, text),
            customer: with_notes(CUSTOMER_INSTRUCTION, text),
            adjuster: with_notes(ADJUSTER_INSTRUCTION, text),
            next_step: with_notes(NEXT_STEP_INSTRUCTION, text),
        },
    }
}

/// Renders the single user-role message sent to the model.
#[must_use]
pub fn render_user_message(request: &SummaryRequest) -> String {
    let instructions = &request.instructions;
    let prompts = json!({
        "overall": instructions.overall,
        "customer": instructions.customer,
        "adjuster": instructions.adjuster,
        "nextStep": instructions.next_step,
    });
    format!(
        "Return only a JSON object with exactly the keys {}. Use these prompts: {prompts}",
        SUMMARY_KEYS.join(", ")
    )
}
