//! Free-text damage extraction.
//!
//! The extractor is an injected capability: the reporting session holds a
//! `&dyn DamageExtractor` and never depends on a concrete model, so tests
//! and offline sessions can swap in anything that implements the trait.

use relief_map_report_models::{DamageDetails, DamageType};
use serde::Serialize;
use serde_json::Value;

use crate::AiError;
use crate::providers::{
    ContentBlock, LlmProvider, Message, ProviderSettings, StopReason, create_provider,
    response_text,
};

/// Name of the single tool offered to the model.
pub const ASSESSMENT_TOOL: &str = "record_damage_assessment";

const SYSTEM_PROMPT: &str = "You are an expert crisis data analyst. Extract precise data from \
natural language reports about flood and landslide damage. Only report figures that the text \
states or clearly implies. Always answer by calling the record_damage_assessment tool.";

/// A model's guess at the category and details of a report.
///
/// Only ever used to pre-fill fields the reporter can still edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageSuggestion {
    /// Suggested category and payload.
    pub details: DamageDetails,
    /// Model's self-reported confidence, clamped to `[0, 1]`.
    pub confidence: f64,
}

impl DamageSuggestion {
    /// Suggested category.
    #[must_use]
    pub const fn damage_type(&self) -> DamageType {
        self.details.damage_type()
    }
}

/// Something that can turn a free-text description into a suggestion.
#[async_trait::async_trait]
pub trait DamageExtractor: Send + Sync {
    /// Extracts a suggestion from `text`.
    ///
    /// Returns `Ok(None)` when there is nothing to extract or the model
    /// declines to classify the text.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the model could not be reached or its answer
    /// could not be read.
    async fn extract(&self, text: &str) -> Result<Option<DamageSuggestion>, AiError>;
}

/// Runs `extractor` and treats every failure as "no suggestion".
pub async fn suggest(extractor: &dyn DamageExtractor, text: &str) -> Option<DamageSuggestion> {
    match extractor.extract(text).await {
        Ok(suggestion) => suggestion,
        Err(e) => {
            log::warn!("Damage extraction failed: {e}");
            None
        }
    }
}

/// [`DamageExtractor`] backed by an LLM provider.
pub struct LlmDamageExtractor {
    provider: Box<dyn LlmProvider>,
}

impl LlmDamageExtractor {
    /// Wraps an already configured provider.
    #[must_use]
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Creates an extractor for the provider described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`AiError::Config`] if no provider can be configured.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, AiError> {
        Ok(Self::new(create_provider(settings)?))
    }
}

#[async_trait::async_trait]
impl DamageExtractor for LlmDamageExtractor {
    async fn extract(&self, text: &str) -> Result<Option<DamageSuggestion>, AiError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let prompt = format!(
            "Analyze the following disaster damage report text and extract structured data \
             suitable for a database.\nContext: Floods and landslides.\nText: \"{text}\""
        );

        let response = self
            .provider
            .chat(SYSTEM_PROMPT, &[Message::user(prompt)], &[tool_definition()])
            .await?;

        let assessment = match find_assessment(&response.content) {
            Some(assessment) => assessment,
            None if response.stop_reason == StopReason::MaxTokens => {
                return Err(AiError::Truncated);
            }
            None => return Err(AiError::MissingAssessment),
        };
        let suggestion = parse_suggestion(&assessment);

        if let Some(s) = &suggestion {
            log::debug!(
                "Extracted {} suggestion with confidence {:.2}",
                s.damage_type(),
                s.confidence
            );
        } else {
            log::debug!("Model declined to classify the description");
        }

        Ok(suggestion)
    }
}

/// JSON Schema tool definition mirroring the report payload shape.
#[must_use]
pub fn tool_definition() -> Value {
    serde_json::json!({
        "name": ASSESSMENT_TOOL,
        "description": "Record the structured damage assessment extracted from a field report. \
                        Fill in only the details object matching the chosen type.",
        "parameters": {
            "type": "object",
            "properties": {
                "type": {
                    "type": "string",
                    "enum": ["HOME", "BUSINESS", "VEHICLE"],
                    "description": "The primary category of the damage report."
                },
                "homeDetails": {
                    "type": "object",
                    "properties": {
                        "residents": { "type": "integer", "description": "Number of family members." },
                        "damagePercentage": { "type": "number", "description": "Estimated percentage of damage (0-100)." },
                        "memberAges": {
                            "type": "array",
                            "items": { "type": "integer" },
                            "description": "Ages of the family members if mentioned."
                        }
                    }
                },
                "businessDetails": {
                    "type": "object",
                    "properties": {
                        "size": { "type": "string", "enum": ["SMALL", "MEDIUM", "LARGE"] },
                        "damagePercentage": { "type": "number", "description": "Estimated percentage of damage to the business (0-100)." }
                    }
                },
                "vehicleDetails": {
                    "type": "object",
                    "properties": {
                        "type": { "type": "string", "enum": ["BIKE", "CAR", "VAN", "CAB", "LORRY", "BUS"] },
                        "count": { "type": "integer", "description": "Number of vehicles." }
                    }
                },
                "confidence": { "type": "number", "description": "Confidence score 0-1." }
            },
            "required": ["type", "confidence"]
        }
    })
}

/// Picks the assessment out of a response: the tool call if there is one,
/// otherwise a JSON object in the text (optionally inside a code fence).
fn find_assessment(blocks: &[ContentBlock]) -> Option<Value> {
    let from_tool = blocks.iter().find_map(|b| match b {
        ContentBlock::ToolUse { name, input, .. } if name == ASSESSMENT_TOOL => Some(input.clone()),
        _ => None,
    });
    if from_tool.is_some() {
        return from_tool;
    }

    let text = response_text(blocks);
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str::<Value>(unfenced.trim())
        .ok()
        .filter(Value::is_object)
}

/// Decodes an assessment object into a suggestion.
///
/// Returns `None` when the object names no recognizable category.
#[must_use]
pub fn parse_suggestion(assessment: &Value) -> Option<DamageSuggestion> {
    let damage_type = assessment
        .get("type")?
        .as_str()?
        .trim()
        .to_uppercase()
        .parse::<DamageType>()
        .ok()?;

    let details =
        DamageDetails::from_lenient_payload(damage_type, assessment.get(damage_type.payload_key()));

    let confidence = assessment
        .get("confidence")
        .and_then(Value::as_f64)
        .filter(|c| c.is_finite())
        .unwrap_or(0.0)
        .clamp(0.0, 1.0);

    Some(DamageSuggestion {
        details,
        confidence,
    })
}
