//! Claim Store adapters: fixture-backed and DynamoDB-backed.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, bail};
use async_trait::async_trait;
use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::types::AttributeValue;
use serde_json::{Map, Number, Value};
use tracing::{debug, info};

use crate::core::models::ClaimRecord;
use crate::errors::SummaryError;

#[async_trait]
pub trait ClaimStore: Send + Sync {
    async fn get_claim(&self, claim_id: &str) -> Result<ClaimRecord, SummaryError>;
}

/// Claim records held in memory, keyed by their `id` field.
#[derive(Debug, Default, Clone)]
pub struct FixtureClaimStore {
    claims: HashMap<String, ClaimRecord>,
}

impl FixtureClaimStore {
    #[must_use]
    pub fn new(claims: HashMap<String, ClaimRecord>) -> Self {
        Self { claims }
    }

    /// Parses a JSON list of claim objects, each carrying a string `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not a list of objects with ids.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let entries: Vec<ClaimRecord> =
            serde_json::from_str(json).context("claims fixture is not a list of objects")?;

        let mut claims = HashMap::with_capacity(entries.len());
        for (index, record) in entries.into_iter().enumerate() {
            let Some(id) = record.get("id").and_then(Value::as_str).map(str::to_string) else {
                bail!("claim at index {index} has no string id");
            };
            claims.insert(id, record);
        }
        Ok(Self { claims })
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading claims fixture {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing {}", path.display()))
    }
}

#[async_trait]
impl ClaimStore for FixtureClaimStore {
    async fn get_claim(&self, claim_id: &str) -> Result<ClaimRecord, SummaryError> {
        debug!(claim_id, "Reading claim from fixture");
        self.claims
            .get(claim_id)
            .cloned()
            .ok_or_else(|| SummaryError::NotFound(claim_id.to_string()))
    }
}

/// Claims stored in a DynamoDB table with string partition key `id`.
pub struct DynamoClaimStore {
    client: DynamoClient,
    table: String,
}

impl DynamoClaimStore {
    #[must_use]
    pub fn new(client: DynamoClient, table: String) -> Self {
        Self { client, table }
    }
}

#[async_trait]
impl ClaimStore for DynamoClaimStore {
    async fn get_claim(&self, claim_id: &str) -> Result<ClaimRecord, SummaryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .key("id", AttributeValue::S(claim_id.to_string()))
            .send()
            .await
            .map_err(|e| map_get_item_error(&self.table, &e))?;

        record_from_item(claim_id, &self.table, output.item)
    }
}

/// Every `get_item` failure is a store failure; an absent claim arrives as an
/// empty item, not as an error.
pub fn map_get_item_error<R>(table: &str, error: &SdkError<GetItemError, R>) -> SummaryError {
    SummaryError::StoreUnavailable(format!("dynamodb get_item {table}: {error}"))
}

/// # Errors
///
/// Returns `NotFound` when the table holds no item for `claim_id`.
pub fn record_from_item(
    claim_id: &str,
    table: &str,
    item: Option<HashMap<String, AttributeValue>>,
) -> Result<ClaimRecord, SummaryError> {
    let Some(item) = item else {
        info!(claim_id, table, "Claim not found");
        return Err(SummaryError::NotFound(claim_id.to_string()));
    };
    Ok(item_to_record(&item))
}

/// Converts a DynamoDB item to plain JSON, the way the document client
/// unmarshalls it.
#[must_use]
pub fn item_to_record(item: &HashMap<String, AttributeValue>) -> ClaimRecord {
    item.iter()
        .map(|(name, value)| (name.clone(), attribute_to_json(value)))
        .collect()
}

fn number_to_json(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::Number(i.into());
    }
    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map_or_else(|| Value::String(raw.to_string()), Value::Number)
}

fn attribute_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => number_to_json(n),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::L(list) => Value::Array(list.iter().map(attribute_to_json).collect()),
        AttributeValue::M(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), attribute_to_json(v)))
                .collect::<Map<_, _>>(),
        ),
        AttributeValue::Ss(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Ns(items) => Value::Array(items.iter().map(|n| number_to_json(n)).collect()),
        // Binary attributes have no JSON form.
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::types::error::ResourceNotFoundException;
    use serde_json::json;

    #[test]
    fn test_item_to_record_unmarshalls_nested_values() {
        let mut address = HashMap::new();
        address.insert("city".to_string(), AttributeValue::S("Austin".to_string()));

        let mut item = HashMap::new();
        item.insert("id".to_string(), AttributeValue::S("CLM-1".to_string()));
        item.insert("amount".to_string(), AttributeValue::N("1250".to_string()));
        item.insert("deductible".to_string(), AttributeValue::N("250.5".to_string()));
        item.insert("open".to_string(), AttributeValue::Bool(true));
        item.insert("closedAt".to_string(), AttributeValue::Null(true));
        item.insert("address".to_string(), AttributeValue::M(address));
        item.insert(
            "tags".to_string(),
            AttributeValue::Ss(vec!["auto".to_string(), "hail".to_string()]),
        );

        let record = Value::Object(item_to_record(&item));
        assert_eq!(
            record,
            json!({
                "id": "CLM-1",
                "amount": 1250,
                "deductible": 250.5,
                "open": true,
                "closedAt": null,
                "address": { "city": "Austin" },
                "tags": ["auto", "hail"]
            })
        );
    }

    #[test]
    fn test_missing_item_is_not_found() {
        assert_eq!(
            record_from_item("CLM-9", "claims", None),
            Err(SummaryError::NotFound("CLM-9".to_string()))
        );

        let mut item = HashMap::new();
        item.insert("id".to_string(), AttributeValue::S("CLM-1".to_string()));
        let record = record_from_item("CLM-1", "claims", Some(item)).unwrap();
        assert_eq!(record["id"], "CLM-1");
    }

    #[test]
    fn test_get_item_failures_map_to_store_unavailable() {
        let missing_table: SdkError<GetItemError, ()> = SdkError::service_error(
            GetItemError::ResourceNotFoundException(
                ResourceNotFoundException::builder()
                    .message("Requested resource not found")
                    .build(),
            ),
            (),
        );
        let timeout: SdkError<GetItemError, ()> =
            SdkError::timeout_error("operation timed out after 3s");

        for error in [missing_table, timeout] {
            let mapped = map_get_item_error("claims", &error);
            assert!(
                matches!(mapped, SummaryError::StoreUnavailable(ref msg) if msg.contains("claims")),
                "unexpected mapping: {mapped:?}"
            );
            assert!(mapped.is_retryable());
        }
    }

    #[test]
    fn test_from_json_requires_ids() {
        let err = FixtureClaimStore::from_json(r#"[{"id":"A"},{"status":"open"}]"#).unwrap_err();
        assert!(format!("{err:#}").contains("index 1"));
    }
}
