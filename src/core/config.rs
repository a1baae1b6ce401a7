use std::env;
use std::path::PathBuf;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_CLAIMS_TABLE: &str = "claims";
pub const DEFAULT_NOTES_BUCKET: &str = "claim-notes";
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-sonnet-20240229-v1:0";
pub const DEFAULT_MOCK_DATA_DIR: &str = "mocks";

/// Where claim records and notes are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// JSON fixture files under `mock_data_dir`.
    Fixture,
    /// DynamoDB for claims, S3 for notes.
    Remote,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub region: String,
    pub claims_table: String,
    pub notes_bucket: String,
    pub model_id: String,
    pub data_source: DataSource,
    pub mock_data_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let data_source = match lookup("MOCK_DATA").as_deref().map(str::trim) {
            Some("true") => DataSource::Fixture,
            None | Some("" | "false") => DataSource::Remote,
            Some(other) => {
                return Err(format!(
                    "MOCK_DATA: expected \"true\" or \"false\", got {other:?}"
                ));
            }
        };

        Ok(Self {
            region: var_or("AWS_REGION", DEFAULT_REGION),
            claims_table: var_or("CLAIMS_TABLE", DEFAULT_CLAIMS_TABLE),
            notes_bucket: var_or("NOTES_BUCKET", DEFAULT_NOTES_BUCKET),
            model_id: var_or("BEDROCK_MODEL_ID", DEFAULT_MODEL_ID),
            data_source,
            mock_data_dir: PathBuf::from(var_or("MOCK_DATA_DIR", DEFAULT_MOCK_DATA_DIR)),
        })
    }
}

/// Fixed generation settings for every model call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub anthropic_version: &'static str,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            anthropic_version: "bedrock-2023-05-31",
            max_tokens: 512,
            // Low randomness keeps the JSON shape stable across calls.
            temperature: 0.2,
        }
    }
}
