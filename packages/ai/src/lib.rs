#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Best-effort extraction of structured damage details from free text.
//!
//! Supports Google Gemini, Anthropic Claude, `OpenAI`, and any
//! `OpenAI`-compatible local/self-hosted server (Ollama, vLLM, llama.cpp,
//! LM Studio) via the `AI_BASE_URL` environment variable.
//!
//! The model is offered a single tool whose schema mirrors a damage report
//! payload. Whatever comes back is decoded leniently into a
//! [`extract::DamageSuggestion`], which callers only ever use to pre-fill
//! fields the reporter still confirms. [`extract::suggest`] turns every
//! failure into "no suggestion".

pub mod extract;
pub mod providers;

use thiserror::Error;

pub use extract::{DamageExtractor, DamageSuggestion, LlmDamageExtractor, suggest};

/// Errors that can occur during AI operations.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request to LLM provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },

    /// The model answered without calling the assessment tool or returning
    /// a JSON object.
    #[error("Model returned no structured assessment")]
    MissingAssessment,

    /// The model hit its output limit before finishing the assessment.
    #[error("Model response was cut off by the token limit")]
    Truncated,

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}
