//! AI insight client with provider failover
//!
//! Obtains a natural-language enrichment for an already-scored reflection
//! from one of several equivalent external providers. Individual provider
//! outages rotate the call to the next provider; when every provider fails,
//! a canned fallback message is returned instead of an error. Callers always
//! get a non-empty response.

pub mod providers;

use std::sync::Mutex;

use rand::seq::SliceRandom;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};

use rstw_common::models::{BurnoutRisk, SentimentLabel};

use providers::{
    ChatMessage, ChatRequest, ChatResponse, GenerateContent, GeneratePart, GenerateRequest,
    GenerateResponse, GenerationConfig, Protocol, ProviderConfig,
};

/// Canned responses used when every provider fails
pub const FALLBACK_RESPONSES: &[&str] = &[
    "Thank you for sharing your thoughts. While our AI assistants are temporarily unavailable, remember that your mental wellness journey is important. Consider taking a few deep breaths, practicing mindfulness, or reaching out to a trusted friend or mental health professional.",
    "I appreciate you taking time for self-reflection. Although our AI analysis is currently offline, this moment of introspection itself is valuable. Try some gentle movement, journaling, or a brief meditation to support your wellbeing right now.",
    "Your willingness to engage with your mental health is commendable. While our AI insights are temporarily unavailable, consider what emotions you're experiencing right now and practice self-compassion. Small acts of self-care can make a meaningful difference.",
];

/// Name reported when the fallback pool answered
pub const FALLBACK_PROVIDER: &str = "fallback";

/// Assessment context forwarded to the provider prompt
#[derive(Debug, Clone)]
pub struct InsightContext {
    pub mood: SentimentLabel,
    pub stress_level: BurnoutRisk,
    pub keyword_count: usize,
}

/// Result of an enrichment call; always carries non-empty content
#[derive(Debug, Clone)]
pub struct Insight {
    pub content: String,
    pub provider: String,
    pub success: bool,
}

/// Failure of a single provider call; absorbed by the rotation, never
/// surfaced to HTTP callers.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse provider response: {0}")]
    Parse(String),

    #[error("provider returned empty content")]
    EmptyContent,
}

/// Rotation bookkeeping, process lifetime only
#[derive(Debug)]
struct RotationState {
    cursor: usize,
    failures: Vec<u32>,
    last_successful: Option<usize>,
}

/// Snapshot of rotation state for logging and diagnostics
#[derive(Debug, Clone)]
pub struct ProviderStats {
    pub current_provider: Option<String>,
    pub last_successful: Option<String>,
    pub failure_counts: Vec<(String, u32)>,
}

/// Failover client over an ordered, fixed provider list.
///
/// Rotation state lives on the instance so tests can construct independent
/// clients with deterministic provider orderings.
pub struct InsightClient {
    http: Client,
    providers: Vec<ProviderConfig>,
    state: Mutex<RotationState>,
}

impl InsightClient {
    pub fn new(providers: Vec<ProviderConfig>) -> Self {
        let failures = vec![0; providers.len()];
        Self {
            // Per-call timeouts are applied per request; the client itself
            // carries no global deadline.
            http: Client::new(),
            providers,
            state: Mutex::new(RotationState {
                cursor: 0,
                failures,
                last_successful: None,
            }),
        }
    }

    /// Client over the default provider set, keys from the environment
    pub fn from_env() -> Self {
        Self::new(ProviderConfig::default_set())
    }

    /// Attempt the enrichment against each provider at most once, starting at
    /// the rotation cursor. The cursor is sticky on success: a successful
    /// provider stays current and only failures advance the rotation.
    ///
    /// Never errors: exhaustion yields a canned fallback with
    /// `success: false`.
    pub async fn generate_insight(&self, prompt: &str, context: &InsightContext) -> Insight {
        let attempts = self.providers.len();

        for _ in 0..attempts {
            let index = {
                let state = self.state.lock().expect("rotation state poisoned");
                state.cursor
            };
            let provider = &self.providers[index];

            debug!(provider = %provider.name, "Attempting insight provider");
            match self.call_provider(provider, prompt, context).await {
                Ok(content) => {
                    self.record_success(index);
                    info!(provider = %provider.name, "Insight provider call successful");
                    return Insight {
                        content,
                        provider: provider.name.clone(),
                        success: true,
                    };
                }
                Err(err) => {
                    warn!(provider = %provider.name, error = %err, "Insight provider failed");
                    self.record_failure(index);
                }
            }
        }

        let stats = self.stats();
        warn!(
            last_successful = stats.last_successful.as_deref().unwrap_or("none"),
            "All insight providers unavailable; using fallback response"
        );

        let content = FALLBACK_RESPONSES
            .choose(&mut rand::thread_rng())
            .expect("fallback pool is non-empty")
            .to_string();

        Insight {
            content,
            provider: FALLBACK_PROVIDER.to_string(),
            success: false,
        }
    }

    /// Snapshot the rotation state
    pub fn stats(&self) -> ProviderStats {
        let state = self.state.lock().expect("rotation state poisoned");
        ProviderStats {
            current_provider: self.providers.get(state.cursor).map(|p| p.name.clone()),
            last_successful: state
                .last_successful
                .and_then(|i| self.providers.get(i))
                .map(|p| p.name.clone()),
            failure_counts: self
                .providers
                .iter()
                .zip(state.failures.iter())
                .map(|(p, count)| (p.name.clone(), *count))
                .collect(),
        }
    }

    fn record_success(&self, index: usize) {
        let mut state = self.state.lock().expect("rotation state poisoned");
        state.failures[index] = 0;
        state.last_successful = Some(index);
    }

    fn record_failure(&self, index: usize) {
        let mut state = self.state.lock().expect("rotation state poisoned");
        state.failures[index] += 1;
        state.cursor = (state.cursor + 1) % self.providers.len();
    }

    async fn call_provider(
        &self,
        provider: &ProviderConfig,
        prompt: &str,
        context: &InsightContext,
    ) -> Result<String, ProviderError> {
        match provider.protocol {
            Protocol::Chat => self.call_chat(provider, prompt, context).await,
            Protocol::Generate => self.call_generate(provider, prompt, context).await,
        }
    }

    async fn call_chat(
        &self,
        provider: &ProviderConfig,
        prompt: &str,
        context: &InsightContext,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", provider.base_url);

        let system = format!(
            "You are an AI wellness assistant for Restwell. Provide empathetic, \
             actionable mental health insights. User context: mood={}, stress_level={}.",
            context.mood.as_str(),
            context.stress_level.as_str()
        );

        let body = ChatRequest {
            model: provider.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: provider.max_tokens,
            temperature: provider.temperature,
            stream: false,
        };

        let mut request = self
            .http
            .post(&url)
            .timeout(provider.timeout)
            .json(&body);
        if let Some(key) = &provider.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        extract_content(
            parsed
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content),
        )
    }

    async fn call_generate(
        &self,
        provider: &ProviderConfig,
        prompt: &str,
        context: &InsightContext,
    ) -> Result<String, ProviderError> {
        let url = format!(
            "{}/models/{}:generateContent",
            provider.base_url, provider.model
        );

        let full_prompt = format!(
            "As Restwell's AI wellness assistant, analyze this mental health reflection \
             and provide personalized insights.\n\n\
             User Context: mood={}, stress_level={}, keyword_count={}\n\
             User Input: {}\n\n\
             Please provide empathetic, actionable recommendations for mental wellness.",
            context.mood.as_str(),
            context.stress_level.as_str(),
            context.keyword_count,
            prompt
        );

        let body = GenerateRequest {
            contents: vec![GenerateContent {
                parts: vec![GeneratePart { text: full_prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: provider.temperature,
                max_output_tokens: provider.max_tokens,
                top_p: 0.9,
                top_k: 40,
            },
        };

        let mut request = self
            .http
            .post(&url)
            .timeout(provider.timeout)
            .json(&body);
        if let Some(key) = &provider.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        extract_content(
            parsed
                .candidates
                .into_iter()
                .next()
                .and_then(|candidate| candidate.content.parts.into_iter().next())
                .map(|part| part.text),
        )
    }
}

/// Treat missing or blank content as a provider failure
fn extract_content(content: Option<String>) -> Result<String, ProviderError> {
    match content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ProviderError::EmptyContent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content_rejects_blank() {
        assert!(extract_content(None).is_err());
        assert!(extract_content(Some("   ".to_string())).is_err());
        assert_eq!(extract_content(Some("ok".to_string())).unwrap(), "ok");
    }

    #[test]
    fn test_stats_initial_state() {
        let client = InsightClient::new(ProviderConfig::default_set());
        let stats = client.stats();
        assert_eq!(stats.current_provider.as_deref(), Some("openai"));
        assert_eq!(stats.last_successful, None);
        assert!(stats.failure_counts.iter().all(|(_, count)| *count == 0));
    }

    #[tokio::test]
    async fn test_no_providers_yields_fallback() {
        let client = InsightClient::new(Vec::new());
        let context = InsightContext {
            mood: SentimentLabel::Neutral,
            stress_level: BurnoutRisk::Low,
            keyword_count: 0,
        };

        let insight = client.generate_insight("some reflection", &context).await;
        assert!(!insight.success);
        assert_eq!(insight.provider, FALLBACK_PROVIDER);
        assert!(FALLBACK_RESPONSES.contains(&insight.content.as_str()));
    }
}
