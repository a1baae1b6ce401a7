use std::sync::Arc;

use claimsum::core::config::AppConfig;
use claimsum::worker::{AppState, handler};
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    claimsum::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;

    // Built once so the in-flight table outlives individual invocations.
    let state = Arc::new(AppState::from_config(&config).await.map_err(|e| {
        error!("Failed to initialize state: {:#}", e);
        Error::from(format!("{e:#}"))
    })?);

    run(service_fn(move |event: LambdaEvent<Value>| {
        handler(Arc::clone(&state), event)
    }))
    .await
}
