use std::sync::Arc;

use anyhow::Context;
use aws_config::Region;
use lambda_runtime::{Error, LambdaEvent};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info};

use super::summarize::SummaryOrchestrator;
use crate::adapters::{
    ClaimStore, DynamoClaimStore, FixtureClaimStore, FixtureNoteSource, NoteSource, S3NoteSource,
};
use crate::ai::{BedrockInvoker, ModelInvoker};
use crate::core::config::{AppConfig, DataSource};
use crate::errors::SummaryError;

/// Long-lived collaborators shared by every invocation of the function.
pub struct AppState {
    pub claims: Arc<dyn ClaimStore>,
    pub orchestrator: SummaryOrchestrator,
}

impl AppState {
    #[must_use]
    pub fn new(
        claims: Arc<dyn ClaimStore>,
        notes: Arc<dyn NoteSource>,
        model: Arc<dyn ModelInvoker>,
    ) -> Self {
        Self {
            claims,
            orchestrator: SummaryOrchestrator::new(notes, model),
        }
    }

    /// Wires the stores selected by `config.data_source` and the Bedrock invoker.
    ///
    /// # Errors
    ///
    /// Returns an error if fixture files cannot be loaded.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let shared = aws_config::from_env()
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let claims: Arc<dyn ClaimStore>;
        let notes: Arc<dyn NoteSource>;
        match config.data_source {
            DataSource::Fixture => {
                info!(dir = %config.mock_data_dir.display(), "Using fixture data");
                claims = Arc::new(
                    FixtureClaimStore::from_file(&config.mock_data_dir.join("claims.json"))
                        .context("loading claim fixtures")?,
                );
                notes = Arc::new(
                    FixtureNoteSource::from_file(&config.mock_data_dir.join("notes.json"))
                        .context("loading note fixtures")?,
                );
            }
            DataSource::Remote => {
                info!(
                    table = %config.claims_table,
                    bucket = %config.notes_bucket,
                    "Using DynamoDB and S3"
                );
                claims = Arc::new(DynamoClaimStore::new(
                    aws_sdk_dynamodb::Client::new(&shared),
                    config.claims_table.clone(),
                ));
                notes = Arc::new(S3NoteSource::new(
                    aws_sdk_s3::Client::new(&shared),
                    config.notes_bucket.clone(),
                ));
            }
        }

        let model = Arc::new(BedrockInvoker::new(
            aws_sdk_bedrockruntime::Client::new(&shared),
            config.model_id.clone(),
        ));

        Ok(Self::new(claims, notes, model))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    #[default]
    Summarize,
    GetClaim,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationRequest {
    #[serde(default)]
    pub action: Action,
    #[serde(alias = "id")]
    pub claim_id: Option<String>,
}

#[must_use]
pub fn ok_response(body: &Value) -> Value {
    json!({ "statusCode": 200, "body": body.to_string() })
}

#[must_use]
pub fn err_response(status: u16, message: &str) -> Value {
    json!({
        "statusCode": status,
        "body": json!({ "message": message }).to_string()
    })
}

#[must_use]
pub fn not_found_response(message: &str) -> Value {
    json!({
        "statusCode": 404,
        "body": json!({ "message": message, "kind": "NotFound", "retryable": false }).to_string()
    })
}

/// Maps a pipeline failure to a response carrying its kind.
#[must_use]
pub fn summary_error_response(err: &SummaryError) -> Value {
    let mut body = json!({
        "message": err.to_string(),
        "kind": err.kind().as_str(),
        "retryable": err.is_retryable(),
    });
    if let SummaryError::IncompleteSummary { missing } = err {
        body["missing"] = json!(missing);
    }
    json!({ "statusCode": err.status_code(), "body": body.to_string() })
}

/// Dispatches one invocation payload against the shared state.
pub async fn handle_request(state: &AppState, payload: &Value) -> Value {
    let request: InvocationRequest = match serde_json::from_value(payload.clone()) {
        Ok(request) => request,
        Err(e) => {
            error!("Invalid invocation payload: {}", e);
            return err_response(400, &format!("Invalid request: {e}"));
        }
    };

    let Some(claim_id) = request.claim_id.filter(|id| !id.trim().is_empty()) else {
        return err_response(400, "Missing claimId");
    };

    match request.action {
        Action::GetClaim => match state.claims.get_claim(&claim_id).await {
            Ok(record) => ok_response(&Value::Object(record)),
            Err(SummaryError::NotFound(_)) => not_found_response("Not found"),
            Err(e) => summary_error_response(&e),
        },
        Action::Summarize => match state.orchestrator.summarize(&claim_id).await {
            Ok(summary) => match serde_json::to_value(&summary) {
                Ok(body) => ok_response(&body),
                Err(e) => err_response(500, &format!("Failed to serialize summary: {e}")),
            },
            Err(SummaryError::NotFound(_)) => not_found_response("No notes found"),
            Err(e) => summary_error_response(&e),
        },
    }
}

/// Lambda handler for the worker entrypoint.
///
/// # Errors
///
/// Never fails at the runtime level; every outcome is encoded in the response.
#[tracing::instrument(level = "info", skip(state, event))]
pub async fn function_handler(
    state: Arc<AppState>,
    event: LambdaEvent<Value>,
) -> Result<Value, Error> {
    info!(request_id = %event.context.request_id, "Worker Lambda received invocation");
    Ok(handle_request(&state, &event.payload).await)
}
