//! Generative model client.
//!
//! Encapsulates all model API interactions for generating claim summaries.
//! The invoker returns the model's raw text untouched; parsing lives in
//! [`super::parser`].

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::error::SdkError;
use aws_sdk_bedrockruntime::operation::invoke_model::InvokeModelError;
use aws_sdk_bedrockruntime::primitives::Blob;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::core::config::GenerationParams;
use crate::core::models::SummaryRequest;
use crate::errors::SummaryError;
use crate::prompt::render_user_message;

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// Sends a composed request to a generative model and returns its raw text.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, request: &SummaryRequest) -> Result<String, SummaryError>;
}

/// Builds the Anthropic-on-Bedrock message body for a request.
#[must_use]
pub fn build_request_body(request: &SummaryRequest, params: &GenerationParams) -> Value {
    json!({
        "anthropic_version": params.anthropic_version,
        "max_tokens": params.max_tokens,
        "temperature": params.temperature,
        "messages": [
            {
                "role": "user",
                "content": render_user_message(request)
            }
        ]
    })
}

/// Pulls the text of the first content block out of a model response body.
///
/// # Errors
///
/// Returns `ModelInvocationFailed` if the body is not JSON, has no content
/// blocks, or the first block carries no text.
pub fn extract_first_text(body: &[u8]) -> Result<String, SummaryError> {
    let payload: Value = serde_json::from_slice(body).map_err(|e| {
        SummaryError::ModelInvocationFailed(format!("Failed to parse model response: {e}"))
    })?;

    let first_block = payload
        .get("content")
        .and_then(Value::as_array)
        .and_then(|blocks| blocks.first())
        .ok_or_else(|| {
            SummaryError::ModelInvocationFailed("No content blocks in model response".to_string())
        })?;

    match first_block.get("text").and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(SummaryError::ModelInvocationFailed(
            "No text in first content block".to_string(),
        )),
    }
}

/// Any `invoke_model` failure, throttling included, is reported to the caller
/// as-is; retrying is the caller's decision.
pub fn map_invoke_error<R>(
    claim_id: &str,
    error: &SdkError<InvokeModelError, R>,
) -> SummaryError {
    if matches!(error.as_service_error(), Some(InvokeModelError::ThrottlingException(_))) {
        warn!(claim_id, "Model endpoint throttled the request");
    }
    SummaryError::ModelInvocationFailed(format!("Bedrock invoke_model: {error}"))
}

/// Invokes Anthropic models hosted on Amazon Bedrock.
pub struct BedrockInvoker {
    client: BedrockClient,
    model_id: String,
    params: GenerationParams,
}

impl BedrockInvoker {
    #[must_use]
    pub fn new(client: BedrockClient, model_id: String) -> Self {
        Self {
            client,
            model_id,
            params: GenerationParams::default(),
        }
    }

    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[async_trait]
impl ModelInvoker for BedrockInvoker {
    async fn invoke(&self, request: &SummaryRequest) -> Result<String, SummaryError> {
        let body = build_request_body(request, &self.params);

        #[cfg(feature = "debug-logs")]
        info!("Using model request body:\n{}", body);

        let body_bytes = serde_json::to_vec(&body).map_err(|e| {
            SummaryError::ModelInvocationFailed(format!("Failed to serialize request: {e}"))
        })?;

        info!(
            claim_id = %request.claim_id,
            model_id = %self.model_id,
            estimated_input_tokens = estimate_tokens(&render_user_message(request)),
            "Invoking model"
        );

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body_bytes))
            .send()
            .await
            .map_err(|e| map_invoke_error(&request.claim_id, &e))?;

        let text = extract_first_text(response.body().as_ref())?;
        info!(
            claim_id = %request.claim_id,
            output_chars = text.chars().count(),
            "Model returned output"
        );
        Ok(text)
    }
}
