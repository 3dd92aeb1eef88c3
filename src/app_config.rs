use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO, optionally region-qualified)
    pub source_language: String,

    /// Target language code (ISO, optionally region-qualified)
    pub target_language: String,

    /// Translation config
    pub translation: TranslationConfig,

    /// Chunking config
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Fidelity guard config
    #[serde(default)]
    pub fidelity: FidelityConfig,

    /// Session store config
    #[serde(default)]
    pub session: SessionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Ollama
    #[default]
    Ollama,
    // @provider: OpenAI
    OpenAI,
    // @provider: LM Studio (OpenAI-compatible local server)
    LMStudio,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ollama => "Ollama",
            Self::OpenAI => "OpenAI",
            Self::LMStudio => "LM Studio",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Ollama => "ollama".to_string(),
            Self::OpenAI => "openai".to_string(),
            Self::LMStudio => "lmstudio".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            "lmstudio" => Ok(Self::LMStudio),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: default_ollama_timeout_secs(),
            },
            TranslationProvider::OpenAI => Self {
                provider_type: "openai".to_string(),
                model: default_openai_model(),
                api_key: String::new(),
                endpoint: default_openai_endpoint(),
                timeout_secs: default_timeout_secs(),
            },
            TranslationProvider::LMStudio => Self {
                provider_type: "lmstudio".to_string(),
                model: default_lmstudio_model(),
                api_key: String::new(),
                endpoint: default_lmstudio_endpoint(),
                timeout_secs: default_ollama_timeout_secs(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,

    /// Whether to run the whole-chapter semantic review call after
    /// quote normalization (best-effort, one extra request per chapter)
    #[serde(default)]
    pub semantic_review: bool,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// System prompt template override for translation.
    /// Empty means the built-in template.
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "String::new")]
    pub system_prompt: String,

    /// Fixed delay in milliseconds between consecutive provider requests
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Temperature parameter for text generation (0.0 to 2.0)
    /// Lower values make output more deterministic, higher values more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: String::new(),
            request_delay_ms: default_request_delay_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Chunk segmentation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap width in characters between consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub overlap: usize,

    /// Chapters at or below this many characters translate as a single
    /// chunk without boundary search
    #[serde(default = "default_direct_cutoff")]
    pub direct_translation_cutoff: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_chunk_overlap(),
            direct_translation_cutoff: default_direct_cutoff(),
        }
    }
}

/// Fidelity guard settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FidelityConfig {
    /// Minimum translated/source word-count ratio to accept without retry
    #[serde(default = "default_fidelity_threshold")]
    pub threshold: f32,

    /// Temperature increase applied to the single anti-summarization retry
    #[serde(default = "default_retry_temperature_delta")]
    pub retry_temperature_delta: f32,
}

impl Default for FidelityConfig {
    fn default() -> Self {
        Self {
            threshold: default_fidelity_threshold(),
            retry_temperature_delta: default_retry_temperature_delta(),
        }
    }
}

/// Session store settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionConfig {
    /// Root directory for per-novel sessions.
    /// None resolves to the platform data directory.
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Maximum characters of running context memory injected into prompts;
    /// older content is dropped first
    #[serde(default = "default_context_char_budget")]
    pub context_char_budget: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            root: None,
            context_char_budget: default_context_char_budget(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_ollama_timeout_secs() -> u64 {
    // Local models can take several minutes on a long chunk
    300
}

fn default_request_delay_ms() -> u64 {
    1000 // 1s default delay between requests
}

fn default_temperature() -> f32 {
    0.3
}

fn default_chunk_size() -> usize {
    3000
}

fn default_chunk_overlap() -> usize {
    150
}

fn default_direct_cutoff() -> usize {
    2000
}

fn default_fidelity_threshold() -> f32 {
    0.90
}

fn default_retry_temperature_delta() -> f32 {
    0.2
}

fn default_context_char_budget() -> usize {
    4000
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_lmstudio_endpoint() -> String {
    // LM Studio default server (OpenAI compatible) runs on port 1234 under /v1
    "http://localhost:1234/v1".to_string()
}

fn default_ollama_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_lmstudio_model() -> String {
    // Placeholder; users should set to the loaded model name in LM Studio
    "local-model".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        crate::language_utils::validate_language_code(&self.source_language)?;
        crate::language_utils::validate_language_code(&self.target_language)?;

        // Validate chunking constraints: 0 < overlap < chunk_size
        if self.chunking.chunk_size == 0 {
            return Err(anyhow!("chunking.chunk_size must be greater than 0"));
        }
        if self.chunking.overlap == 0 || self.chunking.overlap >= self.chunking.chunk_size {
            return Err(anyhow!(
                "chunking.overlap must satisfy 0 < overlap < chunk_size (got overlap={}, chunk_size={})",
                self.chunking.overlap,
                self.chunking.chunk_size
            ));
        }

        // Validate fidelity guard parameters
        if !(self.fidelity.threshold > 0.0 && self.fidelity.threshold <= 1.0) {
            return Err(anyhow!(
                "fidelity.threshold must be in (0.0, 1.0], got {}",
                self.fidelity.threshold
            ));
        }
        if self.fidelity.retry_temperature_delta < 0.0 {
            return Err(anyhow!("fidelity.retry_temperature_delta must be >= 0"));
        }

        // Validate temperature range
        let temperature = self.translation.common.temperature;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(anyhow!("translation.common.temperature must be in [0.0, 2.0], got {}", temperature));
        }

        // Validate the active endpoint parses as a URL
        let endpoint = self.translation.get_endpoint();
        url::Url::parse(&endpoint)
            .map_err(|e| anyhow!("Invalid endpoint URL '{}': {}", endpoint, e))?;

        // Validate API key for hosted providers
        if self.translation.provider == TranslationProvider::OpenAI {
            let api_key = self.translation.get_api_key();
            if api_key.is_empty() {
                return Err(anyhow!("Translation API key is required for OpenAI provider"));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "ja".to_string(),
            target_language: "en".to_string(),
            translation: TranslationConfig::default(),
            chunking: ChunkingConfig::default(),
            fidelity: FidelityConfig::default(),
            session: SessionConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get a specific provider configuration by type for testing
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Ollama => default_ollama_model(),
            TranslationProvider::OpenAI => default_openai_model(),
            TranslationProvider::LMStudio => default_lmstudio_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }

        // Default fallback - local providers don't use API keys
        String::new()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Ollama => default_ollama_endpoint(),
            TranslationProvider::OpenAI => default_openai_endpoint(),
            TranslationProvider::LMStudio => default_lmstudio_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.timeout_secs > 0 {
                return provider_config.timeout_secs;
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Ollama | TranslationProvider::LMStudio => default_ollama_timeout_secs(),
            TranslationProvider::OpenAI => default_timeout_secs(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        let mut config = Self {
            provider: TranslationProvider::default(),
            available_providers: Vec::new(),
            common: TranslationCommonConfig::default(),
            semantic_review: false,
        };

        // Add default providers
        config.available_providers.push(ProviderConfig::new(TranslationProvider::Ollama));
        config.available_providers.push(ProviderConfig::new(TranslationProvider::OpenAI));
        config.available_providers.push(ProviderConfig::new(TranslationProvider::LMStudio));

        config
    }
}
