//! Parsing and schema validation of raw model output.
//!
//! The model is asked for a bare JSON object but often wraps it in prose, so
//! the first well-formed object anywhere in the text is used. The parsed value
//! is then checked field by field before a [`SummaryResult`] is built.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::core::models::SummaryResult;
use crate::errors::SummaryError;
use crate::prompt::SUMMARY_KEYS;

/// Outcome of checking an untyped JSON value against the summary schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// All four fields present, in `SUMMARY_KEYS` order.
    Valid([String; 4]),
    /// Parsed, but the listed fields were missing, empty, or not strings.
    Incomplete(Vec<String>),
    /// Not a JSON object at all.
    Malformed(String),
}

/// Finds the first well-formed JSON object embedded in `raw`.
///
/// Trailing text after the object is ignored, as is leading text that merely
/// contains stray braces.
#[must_use]
pub fn extract_json_object(raw: &str) -> Option<Map<String, Value>> {
    raw.match_indices('{').find_map(|(start, _)| {
        let mut stream = serde_json::Deserializer::from_str(&raw[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(Value::Object(map))) => Some(map),
            _ => None,
        }
    })
}

fn normalize(value: &str) -> String {
    value.trim().to_string()
}

/// Checks the parsed object for the required non-empty string fields.
/// Unknown keys are ignored.
#[must_use]
pub fn validate(object: &Map<String, Value>) -> Validation {
    let fields = SUMMARY_KEYS.map(|key| {
        object
            .get(key)
            .and_then(Value::as_str)
            .map(normalize)
            .filter(|text| !text.is_empty())
    });

    if let [Some(overall), Some(customer), Some(adjuster), Some(next_step)] = fields {
        return Validation::Valid([overall, customer, adjuster, next_step]);
    }

    let missing = SUMMARY_KEYS
        .iter()
        .zip(&fields)
        .filter(|(_, field)| field.is_none())
        .map(|(key, _)| (*key).to_string())
        .collect();
    Validation::Incomplete(missing)
}

/// Classifies raw model text without attaching a claim id.
#[must_use]
pub fn classify(raw: &str) -> Validation {
    match extract_json_object(raw) {
        Some(object) => validate(&object),
        None => Validation::Malformed(preview(raw)),
    }
}

fn preview(raw: &str) -> String {
    const MAX_PREVIEW_CHARS: usize = 120;
    let trimmed = raw.trim();
    if trimmed.chars().count() <= MAX_PREVIEW_CHARS {
        format!("no JSON object in model output: {trimmed:?}")
    } else {
        let head: String = trimmed.chars().take(MAX_PREVIEW_CHARS).collect();
        format!("no JSON object in model output: {head:?}...")
    }
}

/// Parses raw model output into a summary for `claim_id`.
///
/// # Errors
///
/// Returns `MalformedModelOutput` when no JSON object can be located, and
/// `IncompleteSummary` naming every missing or empty field otherwise.
pub fn parse(claim_id: &str, raw: &str) -> Result<SummaryResult, SummaryError> {
    match classify(raw) {
        Validation::Valid([overall, customer, adjuster, next_step]) => {
            debug!(claim_id, "Model output validated");
            Ok(SummaryResult {
                claim_id: claim_id.to_string(),
                overall,
                customer,
                adjuster,
                next_step,
            })
        }
        Validation::Incomplete(missing) => {
            warn!(claim_id, missing = ?missing, "Model output missing summary fields");
            Err(SummaryError::IncompleteSummary { missing })
        }
        Validation::Malformed(reason) => {
            warn!(claim_id, raw_len = raw.len(), "Model output not parseable as JSON");
            Err(SummaryError::MalformedModelOutput(reason))
        }
    }
}
