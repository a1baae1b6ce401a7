use serde::{Deserialize, Serialize};

/// A claim record as stored; its shape is owned by the claim store.
pub type ClaimRecord = serde_json::Map<String, serde_json::Value>;

/// Raw notes for one claim. `text` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimNotes {
    pub claim_id: String,
    pub text: String,
}

/// The four summarization instructions sent in one model call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryInstructions {
    pub overall: String,
    pub customer: String,
    pub adjuster: String,
    pub next_step: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    pub claim_id: String,
    pub instructions: SummaryInstructions,
}

/// The only shape handed back to callers; all four fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub claim_id: String,
    pub overall: String,
    pub customer: String,
    pub adjuster: String,
    pub next_step: String,
}
