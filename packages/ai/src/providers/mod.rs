//! LLM provider abstraction and implementations.
//!
//! Supports Gemini, Anthropic, and `OpenAI` (plus compatible servers) via a
//! common trait.

pub mod anthropic;
pub mod gemini;
pub mod openai;

use serde::{Deserialize, Serialize};

use crate::AiError;

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role: "user" or "assistant".
    pub role: String,
    /// Message text.
    pub content: String,
}

impl Message {
    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A structured content block within a model response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text content.
    Text {
        /// The text.
        text: String,
    },
    /// A tool use request from the assistant.
    ToolUse {
        /// Unique ID for this tool use.
        id: String,
        /// Tool name.
        name: String,
        /// Tool input parameters.
        input: serde_json::Value,
    },
}

/// Response from the LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Content blocks in the response.
    pub content: Vec<ContentBlock>,
    /// Why the model stopped generating.
    pub stop_reason: StopReason,
}

/// Why the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// Model finished its response naturally.
    EndTurn,
    /// Model wants to call one or more tools.
    ToolUse,
    /// Maximum tokens reached.
    MaxTokens,
}

/// Trait for LLM providers.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request with tool definitions.
    ///
    /// Tool definitions use the `{ name, description, parameters }` shape
    /// with a JSON Schema `parameters` object. When `tools` is non-empty the
    /// provider asks the model to answer with a call to one of them.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails.
    async fn chat(
        &self,
        system_prompt: &str,
        messages: &[Message],
        tools: &[serde_json::Value],
    ) -> Result<LlmResponse, AiError>;
}

/// Explicit provider choice, layered over the environment.
///
/// Every `None` field falls back to the matching environment variable
/// (`AI_PROVIDER`, `AI_MODEL`, `AI_BASE_URL`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Provider name: `gemini`, `anthropic`, or `openai`.
    pub provider: Option<String>,
    /// Model identifier.
    pub model: Option<String>,
    /// Base URL of an `OpenAI`-compatible server.
    pub base_url: Option<String>,
}

/// Creates an LLM provider from environment variables alone.
///
/// # Errors
///
/// Returns [`AiError::Config`] if no credentials are found or the
/// requested provider is not configured.
pub fn create_provider_from_env() -> Result<Box<dyn LlmProvider>, AiError> {
    create_provider(&ProviderSettings::default())
}

/// Creates an LLM provider from `settings`, falling back to the environment.
///
/// If no provider is named, auto-detects from available credentials:
///
/// 1. `GEMINI_API_KEY` set -> Google Gemini
/// 2. `ANTHROPIC_API_KEY` set -> Anthropic Claude
/// 3. `OPENAI_API_KEY` or `AI_BASE_URL` set -> `OpenAI` (or compatible)
///
/// # Errors
///
/// Returns [`AiError::Config`] if no credentials are found or the
/// requested provider is not configured.
pub fn create_provider(settings: &ProviderSettings) -> Result<Box<dyn LlmProvider>, AiError> {
    let provider = settings
        .provider
        .clone()
        .or_else(|| std::env::var("AI_PROVIDER").ok())
        .unwrap_or_else(detect_provider);
    let model = settings
        .model
        .clone()
        .or_else(|| std::env::var("AI_MODEL").ok());

    match provider.to_lowercase().as_str() {
        "gemini" | "google" => {
            let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| AiError::Config {
                message: "GEMINI_API_KEY environment variable not set".to_string(),
            })?;
            let model = model.unwrap_or_else(|| gemini::DEFAULT_MODEL.to_string());
            Ok(Box::new(gemini::GeminiProvider::new(api_key, model)))
        }
        "anthropic" | "claude" => {
            let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| AiError::Config {
                message: "ANTHROPIC_API_KEY environment variable not set".to_string(),
            })?;
            let model = model.unwrap_or_else(|| anthropic::DEFAULT_MODEL.to_string());
            Ok(Box::new(anthropic::AnthropicProvider::new(api_key, model)))
        }
        "openai" | "gpt" => {
            let base_url = settings
                .base_url
                .clone()
                .or_else(|| std::env::var("AI_BASE_URL").ok());
            let api_key = match (std::env::var("OPENAI_API_KEY"), &base_url) {
                (Ok(key), _) => key,
                // Local servers usually run without authentication.
                (Err(_), Some(_)) => String::new(),
                (Err(_), None) => {
                    return Err(AiError::Config {
                        message: "OPENAI_API_KEY environment variable not set".to_string(),
                    });
                }
            };
            let model = model.unwrap_or_else(|| openai::DEFAULT_MODEL.to_string());
            let provider = openai::OpenAiProvider::new(api_key, model);
            Ok(Box::new(match base_url {
                Some(url) => provider.with_base_url(url),
                None => provider,
            }))
        }
        other => Err(AiError::Config {
            message: format!(
                "Unknown AI provider: {other}. Use 'gemini', 'anthropic', or 'openai'."
            ),
        }),
    }
}

/// Auto-detects which provider to use based on available credentials.
///
/// Returns a provider name string that matches the arms in
/// [`create_provider`].
fn detect_provider() -> String {
    if std::env::var("GEMINI_API_KEY").is_ok() {
        log::info!("Auto-detected AI provider: Gemini (GEMINI_API_KEY found)");
        return "gemini".to_string();
    }

    if std::env::var("ANTHROPIC_API_KEY").is_ok() {
        log::info!("Auto-detected AI provider: Anthropic (ANTHROPIC_API_KEY found)");
        return "anthropic".to_string();
    }

    if std::env::var("OPENAI_API_KEY").is_ok() || std::env::var("AI_BASE_URL").is_ok() {
        log::info!("Auto-detected AI provider: OpenAI (OPENAI_API_KEY or AI_BASE_URL found)");
        return "openai".to_string();
    }

    log::warn!(
        "No AI credentials detected. Set one of: GEMINI_API_KEY, ANTHROPIC_API_KEY, \
         OPENAI_API_KEY, or AI_BASE_URL. You can also set AI_PROVIDER explicitly."
    );

    // Falls through to the missing GEMINI_API_KEY error
    "gemini".to_string()
}

/// Joins the text blocks of a response.
#[must_use]
pub fn response_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter_map(|b| match b {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::ToolUse { .. } => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
