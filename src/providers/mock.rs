/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Always succeeds, echoing the source text
 * - `MockProvider::summarizing()` - Succeeds but returns half the words
 * - `MockProvider::failing()` - Always fails with an error
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::{Provider, TranslationRequest};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds, echoing the source text back unchanged
    Working,
    /// Replays canned responses in order, repeating the last when exhausted
    Scripted { responses: Vec<String> },
    /// Succeeds but keeps only the first half of the source words
    Summarizing,
    /// Returns an empty response
    Empty,
    /// Always fails with an API error
    Failing,
    /// Always fails as if the server were unreachable
    Unavailable,
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared across clones
    request_count: Arc<AtomicUsize>,
    /// Every request seen, shared across clones
    recorded: Arc<Mutex<Vec<TranslationRequest>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&TranslationRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            recorded: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    /// Create a working mock provider that echoes the source text
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock provider that replays the given responses in order
    pub fn scripted(responses: Vec<String>) -> Self {
        Self::new(MockBehavior::Scripted { responses })
    }

    /// Create a mock provider that drops half of the source words
    pub fn summarizing() -> Self {
        Self::new(MockBehavior::Summarizing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock provider that simulates an unreachable server
    pub fn unavailable() -> Self {
        Self::new(MockBehavior::Unavailable)
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&TranslationRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of translate calls made so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Snapshot of every request seen, in call order
    pub fn recorded_requests(&self) -> Vec<TranslationRequest> {
        self.recorded.lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            request_count: Arc::clone(&self.request_count),
            recorded: Arc::clone(&self.recorded),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.push(request.clone());
        }

        match &self.behavior {
            MockBehavior::Working => {
                // Use custom response if set, otherwise echo the source
                let text = if let Some(generator) = self.custom_response {
                    generator(request)
                } else {
                    request.text.clone()
                };
                Ok(text)
            }

            MockBehavior::Scripted { responses } => {
                let index = count.min(responses.len().saturating_sub(1));
                match responses.get(index) {
                    Some(response) => Ok(response.clone()),
                    None => Ok(String::new()),
                }
            }

            MockBehavior::Summarizing => {
                let words: Vec<&str> = request.text.split_whitespace().collect();
                Ok(words[..words.len() / 2].join(" "))
            }

            MockBehavior::Empty => Ok(String::new()),

            MockBehavior::Failing => Err(ProviderError::ApiError {
                message: format!("Simulated provider failure (request #{})", count + 1),
                status_code: 500,
            }),

            MockBehavior::Unavailable => Err(ProviderError::Unavailable(
                "Simulated connection failure".to_string(),
            )),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Unavailable => Err(ProviderError::Unavailable(
                "Simulated connection failure".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
