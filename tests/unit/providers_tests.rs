/*!
 * Tests for provider construction and request wire formats
 */

use anyhow::Result;
use serde_json::json;
use yantai::app_config::{Config, TranslationProvider};
use yantai::providers::mock::MockProvider;
use yantai::providers::ollama::GenerationRequest;
use yantai::providers::openai::ChatCompletionRequest;
use yantai::providers::{create_provider, Provider, TranslationRequest};

/// Test that the default configuration builds the Ollama client
#[test]
fn test_create_provider_withDefaultConfig_shouldBuildOllama() -> Result<()> {
    let config = Config::default();

    let provider = create_provider(&config.translation)?;

    assert_eq!(provider.name(), "ollama");
    Ok(())
}

/// Test that OpenAI and LM Studio both use the chat completions client
#[test]
fn test_create_provider_withOpenAiCompatible_shouldBuildOpenAiClient() -> Result<()> {
    let mut config = Config::default();

    config.translation.provider = TranslationProvider::OpenAI;
    assert_eq!(create_provider(&config.translation)?.name(), "openai");

    config.translation.provider = TranslationProvider::LMStudio;
    assert_eq!(create_provider(&config.translation)?.name(), "openai");

    Ok(())
}

/// Test that a translation request carries its fields unchanged
#[test]
fn test_translationRequest_new_shouldKeepFields() {
    let request = TranslationRequest::new("be precise", "the text", 0.4);

    assert_eq!(request.system_prompt, "be precise");
    assert_eq!(request.text, "the text");
    assert!((request.temperature - 0.4).abs() < f32::EPSILON);
}

/// Test the Ollama generate request wire shape
#[test]
fn test_generationRequest_serialization_shouldMatchOllamaApi() -> Result<()> {
    // 0.5 is exact in both f32 and f64, so the JSON comparison is stable
    let request = GenerationRequest::new("llama3.1:8b", "translate this")
        .system("you translate novels")
        .temperature(0.5)
        .no_stream();

    let value = serde_json::to_value(&request)?;

    assert_eq!(
        value,
        json!({
            "model": "llama3.1:8b",
            "prompt": "translate this",
            "system": "you translate novels",
            "options": {"temperature": 0.5},
            "stream": false
        })
    );

    Ok(())
}

/// Test the chat completions request wire shape
#[test]
fn test_chatCompletionRequest_serialization_shouldMatchOpenAiApi() -> Result<()> {
    let request = ChatCompletionRequest::new("gpt-4o-mini")
        .add_message("system", "you translate novels")
        .add_message("user", "translate this")
        .temperature(0.5);

    let value = serde_json::to_value(&request)?;

    assert_eq!(
        value,
        json!({
            "model": "gpt-4o-mini",
            "messages": [
                {"role": "system", "content": "you translate novels"},
                {"role": "user", "content": "translate this"}
            ],
            "temperature": 0.5,
            "stream": false
        })
    );

    Ok(())
}

/// Test that providers work through the trait object the controller holds
#[tokio::test]
async fn test_provider_asTraitObject_shouldDispatchCalls() -> Result<()> {
    let boxed: Box<dyn Provider> = Box::new(MockProvider::scripted(vec!["resposta".to_string()]));

    boxed.test_connection().await?;
    let answer = boxed
        .translate(&TranslationRequest::new("sys", "texto", 0.3))
        .await?;

    assert_eq!(answer, "resposta");
    Ok(())
}
