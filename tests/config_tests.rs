use std::collections::HashMap;
use std::path::PathBuf;

use claimsum::core::config::{AppConfig, DEFAULT_MODEL_ID, DataSource, GenerationParams};

fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults_when_unset() {
    let config = config_from(&[]).unwrap();

    assert_eq!(config.region, "us-east-1");
    assert_eq!(config.claims_table, "claims");
    assert_eq!(config.notes_bucket, "claim-notes");
    assert_eq!(config.model_id, DEFAULT_MODEL_ID);
    assert_eq!(config.data_source, DataSource::Remote);
    assert_eq!(config.mock_data_dir, PathBuf::from("mocks"));
}

#[test]
fn test_overrides_are_applied() {
    let config = config_from(&[
        ("AWS_REGION", "eu-west-1"),
        ("CLAIMS_TABLE", "claims-prod"),
        ("NOTES_BUCKET", "notes-prod"),
        ("BEDROCK_MODEL_ID", "anthropic.claude-3-haiku-20240307-v1:0"),
        ("MOCK_DATA", "true"),
        ("MOCK_DATA_DIR", "/opt/mocks"),
    ])
    .unwrap();

    assert_eq!(config.region, "eu-west-1");
    assert_eq!(config.claims_table, "claims-prod");
    assert_eq!(config.notes_bucket, "notes-prod");
    assert_eq!(config.model_id, "anthropic.claude-3-haiku-20240307-v1:0");
    assert_eq!(config.data_source, DataSource::Fixture);
    assert_eq!(config.mock_data_dir, PathBuf::from("/opt/mocks"));
}

#[test]
fn test_blank_values_fall_back_to_defaults() {
    let config = config_from(&[("CLAIMS_TABLE", "  "), ("MOCK_DATA", "")]).unwrap();
    assert_eq!(config.claims_table, "claims");
    assert_eq!(config.data_source, DataSource::Remote);
}

#[test]
fn test_invalid_mock_flag_is_rejected() {
    let err = config_from(&[("MOCK_DATA", "yes")]).unwrap_err();
    assert!(err.starts_with("MOCK_DATA"));
}

#[test]
fn test_generation_params_are_fixed() {
    let params = GenerationParams::default();
    assert_eq!(params.max_tokens, 512);
    assert!((params.temperature - 0.2).abs() < f32::EPSILON);
    assert_eq!(params.anthropic_version, "bedrock-2023-05-31");
}
