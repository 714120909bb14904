//! Google Gemini provider implementation (`generateContent` with function
//! calling).

use serde::{Deserialize, Serialize};

use super::{ContentBlock, LlmProvider, LlmResponse, Message, StopReason};
use crate::AiError;

/// Model used when `AI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Gemini API provider.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider.
    #[must_use]
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<serde_json::Value>,
    generation_config: serde_json::Value,
}

#[derive(Serialize, Deserialize, Default)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<GeminiFunctionCall>,
}

impl GeminiPart {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            function_call: None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiContent,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    error: GeminiErrorDetail,
}

#[derive(Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[async_trait::async_trait]
impl LlmProvider for GeminiProvider {
    async fn chat(
        &self,
        system_prompt: &str,
        messages: &[Message],
        tools: &[serde_json::Value],
    ) -> Result<LlmResponse, AiError> {
        let contents = messages
            .iter()
            .map(|m| GeminiContent {
                // Gemini calls the assistant role "model"
                role: Some(if m.role == "assistant" { "model" } else { "user" }.to_string()),
                parts: vec![GeminiPart::text(&m.content)],
            })
            .collect();

        let declarations: Vec<serde_json::Value> = tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "name": t["name"],
                    "description": t["description"],
                    "parametersJsonSchema": t["parameters"],
                })
            })
            .collect();

        let (tools, tool_config) = if declarations.is_empty() {
            (Vec::new(), None)
        } else {
            (
                vec![serde_json::json!({ "functionDeclarations": declarations })],
                Some(serde_json::json!({ "functionCallingConfig": { "mode": "ANY" } })),
            )
        };

        let request = GeminiRequest {
            system_instruction: GeminiContent {
                role: None,
                parts: vec![GeminiPart::text(system_prompt)],
            },
            contents,
            tools,
            tool_config,
            generation_config: serde_json::json!({ "maxOutputTokens": 2048 }),
        };

        let resp = self
            .client
            .post(format!(
                "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                self.model
            ))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let err: GeminiError = serde_json::from_str(&body).unwrap_or_else(|_| GeminiError {
                error: GeminiErrorDetail {
                    message: format!("HTTP {status}: {body}"),
                },
            });
            return Err(AiError::Provider {
                message: err.error.message,
            });
        }

        let response: GeminiResponse = serde_json::from_str(&body)?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AiError::Provider {
                message: "No candidates in Gemini response".to_string(),
            })?;

        let mut content = Vec::new();
        for (index, part) in candidate.content.parts.into_iter().enumerate() {
            if let Some(text) = part.text
                && !text.is_empty()
            {
                content.push(ContentBlock::Text { text });
            }
            if let Some(call) = part.function_call {
                // Gemini does not assign call ids
                content.push(ContentBlock::ToolUse {
                    id: format!("call_{index}"),
                    name: call.name,
                    input: call.args,
                });
            }
        }

        let stop_reason = if content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
        {
            StopReason::ToolUse
        } else if candidate.finish_reason.as_deref() == Some("MAX_TOKENS") {
            StopReason::MaxTokens
        } else {
            StopReason::EndTurn
        };

        Ok(LlmResponse {
            content,
            stop_reason,
        })
    }
}
