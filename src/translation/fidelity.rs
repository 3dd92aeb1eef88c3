/*!
 * Volume fidelity guard for translated chunks.
 *
 * Word-count ratio is a cheap proxy for "the model summarized instead of
 * translating". The guard issues at most one corrective retry per chunk and
 * degrades to best-effort afterwards, so a stubborn model slows a run down
 * but never stalls it.
 */

use std::time::Duration;

use log::warn;

use crate::app_config::Config;
use crate::errors::ProviderError;
use crate::providers::{Provider, TranslationRequest};
use crate::translation::prompts::ChapterPromptBuilder;

/// How a chunk request should be phrased.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// First attempt for a chunk.
    Normal,

    /// Second attempt after the first came back too short. Carries the
    /// observed counts so the prompt can confront the model with them.
    RetryAfterLowFidelity {
        source_words: usize,
        translated_words: usize,
    },
}

/// Accepted output of the guard for one chunk.
#[derive(Debug, Clone)]
pub struct GuardedTranslation {
    /// The accepted translation text
    pub text: String,

    /// Number of provider calls spent on this chunk (1 or 2)
    pub attempts: u32,

    /// True when even the retry stayed under the threshold
    pub low_fidelity: bool,

    /// Final translated/source word ratio (1.0 when the source had no words)
    pub ratio: f32,
}

/// Guards chunk translations against silent summarization.
///
/// For each chunk: call the provider once at the base temperature and accept
/// the output when `translated_words / source_words` meets the threshold.
/// Below it, retry exactly once with the temperature raised by the configured
/// delta and an explicit anti-summarization directive, then accept whatever
/// comes back, flagging it when the ratio is still low. Sources with no words
/// (markup-only or blank chunks) are accepted as-is since the ratio is
/// undefined for them.
///
/// The guard also owns request pacing: after every provider response it waits
/// the configured delay before returning, which keeps sequential chunk loops
/// from hammering local inference servers.
#[derive(Debug, Clone)]
pub struct FidelityGuard {
    threshold: f32,
    retry_temperature_delta: f32,
    base_temperature: f32,
    request_delay: Duration,
}

impl FidelityGuard {
    /// Create a guard with explicit parameters.
    pub fn new(
        threshold: f32,
        retry_temperature_delta: f32,
        base_temperature: f32,
        request_delay_ms: u64,
    ) -> Self {
        Self {
            threshold,
            retry_temperature_delta,
            base_temperature,
            request_delay: Duration::from_millis(request_delay_ms),
        }
    }

    /// Create a guard from the application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.fidelity.threshold,
            config.fidelity.retry_temperature_delta,
            config.translation.common.temperature,
            config.translation.common.request_delay_ms,
        )
    }

    /// Translate one chunk of source text under the fidelity guard.
    pub async fn translate_chunk(
        &self,
        provider: &dyn Provider,
        prompts: &ChapterPromptBuilder,
        source_text: &str,
    ) -> Result<GuardedTranslation, ProviderError> {
        let source_words = count_words(source_text);

        let request = prompts.request(source_text, RequestMode::Normal, self.base_temperature);
        let candidate = self.paced_call(provider, &request).await?;

        if source_words == 0 {
            return Ok(GuardedTranslation {
                text: candidate,
                attempts: 1,
                low_fidelity: false,
                ratio: 1.0,
            });
        }

        let candidate_words = count_words(&candidate);
        let ratio = candidate_words as f32 / source_words as f32;
        if ratio >= self.threshold {
            return Ok(GuardedTranslation {
                text: candidate,
                attempts: 1,
                low_fidelity: false,
                ratio,
            });
        }

        let retry_temperature = self.base_temperature + self.retry_temperature_delta;
        warn!(
            "Low fidelity ({}/{} words), retrying once at temperature {:.2}",
            candidate_words, source_words, retry_temperature
        );

        let retry_request = prompts.request(
            source_text,
            RequestMode::RetryAfterLowFidelity {
                source_words,
                translated_words: candidate_words,
            },
            retry_temperature,
        );
        let retry = self.paced_call(provider, &retry_request).await?;

        let retry_words = count_words(&retry);
        let retry_ratio = retry_words as f32 / source_words as f32;
        let low_fidelity = retry_ratio < self.threshold;
        if low_fidelity {
            warn!(
                "Fidelity still low after retry ({}/{} words), keeping best-effort output",
                retry_words, source_words
            );
        }

        Ok(GuardedTranslation {
            text: retry,
            attempts: 2,
            low_fidelity,
            ratio: retry_ratio,
        })
    }

    /// One call without the word-count check but with the same pacing as
    /// guarded calls, for best-effort auxiliary passes like review.
    pub async fn call_unguarded(
        &self,
        provider: &dyn Provider,
        request: &TranslationRequest,
    ) -> Result<String, ProviderError> {
        self.paced_call(provider, request).await
    }

    /// Call the provider, then honor the inter-request delay.
    async fn paced_call(
        &self,
        provider: &dyn Provider,
        request: &TranslationRequest,
    ) -> Result<String, ProviderError> {
        let response = provider.translate(request).await?;
        if !self.request_delay.is_zero() {
            tokio::time::sleep(self.request_delay).await;
        }
        Ok(response)
    }
}

/// Count words by whitespace tokenization.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}
