/*!
 * Tests for application configuration
 */

use std::str::FromStr;

use anyhow::Result;
use yantai::app_config::{Config, LogLevel, TranslationProvider};

/// Test that the default configuration is internally consistent
#[test]
fn test_defaultConfig_shouldPassValidation() {
    let config = Config::default();

    assert!(config.validate().is_ok());
    assert_eq!(config.source_language, "ja");
    assert_eq!(config.target_language, "en");
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test that the default chunking and fidelity numbers are in place
#[test]
fn test_defaultConfig_shouldCarryDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.chunking.chunk_size, 3000);
    assert_eq!(config.chunking.overlap, 150);
    assert_eq!(config.chunking.direct_translation_cutoff, 2000);
    assert!((config.fidelity.threshold - 0.90).abs() < 1e-6);
    assert!((config.fidelity.retry_temperature_delta - 0.2).abs() < 1e-6);
    assert_eq!(config.translation.common.request_delay_ms, 1000);
    assert!((config.translation.common.temperature - 0.3).abs() < 1e-6);
    assert_eq!(config.session.context_char_budget, 4000);
    assert!(!config.translation.semantic_review);
}

/// Test that a minimal JSON config parses and fills in every default
#[test]
fn test_configFromJson_withMinimalFields_shouldFillDefaults() -> Result<()> {
    let json = r#"{
        "source_language": "ja",
        "target_language": "pt-BR",
        "translation": {
            "provider": "lmstudio",
            "available_providers": [
                {"type": "lmstudio", "model": "qwen2.5-14b"}
            ]
        }
    }"#;

    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.translation.provider, TranslationProvider::LMStudio);
    assert_eq!(config.translation.get_model(), "qwen2.5-14b");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:1234/v1");
    assert_eq!(config.chunking.chunk_size, 3000);
    assert!((config.fidelity.threshold - 0.90).abs() < 1e-6);
    assert!(config.validate().is_ok());

    Ok(())
}

/// Test that validation rejects an unknown language code
#[test]
fn test_validate_withBadLanguage_shouldFail() {
    let mut config = Config::default();
    config.target_language = "klingon".to_string();

    assert!(config.validate().is_err());
}

/// Test that validation enforces 0 < overlap < chunk_size
#[test]
fn test_validate_withOverlapAtChunkSize_shouldFail() {
    let mut config = Config::default();
    config.chunking.overlap = config.chunking.chunk_size;

    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("overlap"));
}

/// Test that validation bounds the fidelity threshold to (0, 1]
#[test]
fn test_validate_withThresholdOutOfRange_shouldFail() {
    let mut config = Config::default();
    config.fidelity.threshold = 0.0;
    assert!(config.validate().is_err());

    config.fidelity.threshold = 1.5;
    assert!(config.validate().is_err());

    config.fidelity.threshold = 1.0;
    assert!(config.validate().is_ok());
}

/// Test that validation bounds the sampling temperature to [0, 2]
#[test]
fn test_validate_withTemperatureOutOfRange_shouldFail() {
    let mut config = Config::default();
    config.translation.common.temperature = 2.5;

    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("temperature"));
}

/// Test that the OpenAI provider requires an API key
#[test]
fn test_validate_withOpenAiAndNoKey_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::OpenAI;

    assert!(config.validate().is_err());

    if let Some(provider) = config
        .translation
        .available_providers
        .iter_mut()
        .find(|p| p.provider_type == "openai")
    {
        provider.api_key = "sk-test".to_string();
    }
    assert!(config.validate().is_ok());
}

/// Test that validation rejects an endpoint that does not parse as a URL
#[test]
fn test_validate_withBrokenEndpoint_shouldFail() {
    let mut config = Config::default();
    if let Some(provider) = config
        .translation
        .available_providers
        .iter_mut()
        .find(|p| p.provider_type == "ollama")
    {
        provider.endpoint = "not a url".to_string();
    }

    let error = config.validate().unwrap_err();
    assert!(error.to_string().contains("endpoint"));
}

/// Test that provider names parse case-insensitively
#[test]
fn test_providerFromStr_shouldParseKnownNames() {
    assert_eq!(
        TranslationProvider::from_str("ollama").unwrap(),
        TranslationProvider::Ollama
    );
    assert_eq!(
        TranslationProvider::from_str("OpenAI").unwrap(),
        TranslationProvider::OpenAI
    );
    assert_eq!(
        TranslationProvider::from_str("LMSTUDIO").unwrap(),
        TranslationProvider::LMStudio
    );
    assert!(TranslationProvider::from_str("deepl").is_err());
}

/// Test that model and endpoint fall back to provider defaults when the
/// provider list has no matching entry
#[test]
fn test_getModel_withNoProviderEntry_shouldUseBuiltInDefault() {
    let mut config = Config::default();
    config.translation.available_providers.clear();

    assert_eq!(config.translation.get_model(), "llama3.1:8b");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.translation.get_api_key(), "");
}

/// Test that a config survives a serialize/deserialize round trip
#[test]
fn test_configRoundTrip_shouldPreserveFields() -> Result<()> {
    let mut config = Config::default();
    config.target_language = "pt-BR".to_string();
    config.chunking.chunk_size = 2400;
    config.translation.semantic_review = true;

    let json = serde_json::to_string_pretty(&config)?;
    let parsed: Config = serde_json::from_str(&json)?;

    assert_eq!(parsed.target_language, "pt-BR");
    assert_eq!(parsed.chunking.chunk_size, 2400);
    assert!(parsed.translation.semantic_review);

    Ok(())
}
