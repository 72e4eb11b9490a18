//! Provider configuration and wire shapes
//!
//! All providers are equivalent text-generation services; they differ only in
//! request/response shape. Two protocols cover the configured set: a chat
//! protocol (messages array, bearer auth) and a generate protocol (single
//! prompt, key-in-query). The failover loop never special-cases a provider
//! beyond these shapes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Wire protocol spoken by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// OpenAI-style `/chat/completions` with a messages array
    Chat,
    /// Gemini-style `models/{model}:generateContent` with a single prompt
    Generate,
}

/// One configured provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub name: String,
    pub protocol: Protocol,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    /// Per-call timeout for this provider
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ProviderConfig {
    /// The default rotation order, with API keys from the environment.
    /// Providers without a key stay in the rotation; their calls fail and the
    /// rotation moves on.
    pub fn default_set() -> Vec<ProviderConfig> {
        vec![
            ProviderConfig {
                name: "openai".to_string(),
                protocol: Protocol::Chat,
                base_url: "https://api.openai.com/v1".to_string(),
                model: "gpt-4o-mini".to_string(),
                api_key: std::env::var("OPENAI_API_KEY").ok(),
                timeout: Duration::from_secs(15),
                max_tokens: 400,
                temperature: 0.7,
            },
            ProviderConfig {
                name: "perplexity".to_string(),
                protocol: Protocol::Chat,
                base_url: "https://api.perplexity.ai".to_string(),
                model: "sonar".to_string(),
                api_key: std::env::var("PERPLEXITY_API_KEY").ok(),
                timeout: Duration::from_secs(20),
                max_tokens: 400,
                temperature: 0.7,
            },
            ProviderConfig {
                name: "gemini".to_string(),
                protocol: Protocol::Generate,
                base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                model: "gemini-1.5-flash".to_string(),
                api_key: std::env::var("GEMINI_API_KEY").ok(),
                timeout: Duration::from_secs(18),
                max_tokens: 400,
                temperature: 0.7,
            },
        ]
    }
}

// ============================================================================
// Chat protocol wire types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

// ============================================================================
// Generate protocol wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<GenerateContent>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateContent {
    pub parts: Vec<GeneratePart>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratePart {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<GenerateCandidate>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateCandidate {
    pub content: GenerateContent,
}
