/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for various LLM providers:
 * - Ollama: Local LLM server
 * - OpenAI: OpenAI API (and any OpenAI-compatible server such as LM Studio)
 * - Mock: In-memory provider for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::app_config::{TranslationConfig, TranslationProvider};
use crate::errors::ProviderError;

/// A single translation call as the providers see it
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// System prompt guiding the model
    pub system_prompt: String,

    /// Source text to translate
    pub text: String,

    /// Sampling temperature for this call
    pub temperature: f32,
}

impl TranslationRequest {
    /// Create a new translation request
    pub fn new(system_prompt: impl Into<String>, text: impl Into<String>, temperature: f32) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            text: text.into(),
            temperature,
        }
    }
}

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the chapter pipeline. It is kept
/// object safe so callers can hold a `Box<dyn Provider>` chosen at runtime.
///
/// Implementations make exactly one network attempt per call. Recovering from a
/// failed call is the caller's decision, not the client's.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Lowercase provider identifier used in logs and stats
    fn name(&self) -> &'static str;

    /// Perform one translation call
    ///
    /// # Arguments
    /// * `request` - The prompt, source text and temperature for this call
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The raw translated text or an error
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Build the provider selected by the configuration
pub fn create_provider(config: &TranslationConfig) -> anyhow::Result<Box<dyn Provider>> {
    let provider: Box<dyn Provider> = match config.provider {
        TranslationProvider::Ollama => Box::new(ollama::Ollama::new(
            config.get_endpoint(),
            config.get_model(),
            config.get_timeout_secs(),
        )),
        TranslationProvider::OpenAI | TranslationProvider::LMStudio => {
            Box::new(openai::OpenAi::new(
                config.get_endpoint(),
                config.get_api_key(),
                config.get_model(),
                config.get_timeout_secs(),
            ))
        },
    };

    Ok(provider)
}

pub mod ollama;
pub mod openai;
pub mod mock;
