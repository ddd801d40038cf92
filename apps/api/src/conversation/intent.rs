//! Intent Classifier — maps a user message to one label of a closed set.
//!
//! Classification is total: any generation failure, unparseable reply or
//! unknown label is recovered into `IntentLabel::Fallback` with confidence 0.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::conversation::prompts::{
    fill_template, CLASSIFIER_CONTEXT_TEMPLATE, CLASSIFIER_INSTRUCTIONS,
};
use crate::conversation::render::render_history;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{parse_json_reply, GenerationError, TextGenerator};
use crate::session::context::SessionContext;

const MIN_HISTORY_TURNS: usize = 1;
const MAX_HISTORY_TURNS: usize = 8;
/// Used when the model omits a confidence.
const DEFAULT_CONFIDENCE: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentLabel {
    ProfileAnalysis,
    JobFit,
    ContentEnhancement,
    CareerGuidance,
    Fallback,
}

impl IntentLabel {
    pub const ALL: [IntentLabel; 5] = [
        IntentLabel::ProfileAnalysis,
        IntentLabel::JobFit,
        IntentLabel::ContentEnhancement,
        IntentLabel::CareerGuidance,
        IntentLabel::Fallback,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IntentLabel::ProfileAnalysis => "profile_analysis",
            IntentLabel::JobFit => "job_fit",
            IntentLabel::ContentEnhancement => "content_enhancement",
            IntentLabel::CareerGuidance => "career_guidance",
            IntentLabel::Fallback => "fallback",
        }
    }
}

/// Lenient parse of model output: case-insensitive, `-` or spaces for `_`,
/// and the agent-style names (`job_fit_agent`, `career_coach_agent`, ...).
impl FromStr for IntentLabel {
    type Err = ClassificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        let normalized = normalized.strip_suffix("_agent").unwrap_or(&normalized);

        if let Some(label) = IntentLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == normalized)
        {
            return Ok(label);
        }

        match normalized {
            "profile_analyzer" => Ok(IntentLabel::ProfileAnalysis),
            "content_enhancer" => Ok(IntentLabel::ContentEnhancement),
            "career_coach" => Ok(IntentLabel::CareerGuidance),
            _ => Err(ClassificationError::UnknownLabel(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Model,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: IntentLabel,
    pub confidence: f32,
    pub reasoning: String,
    pub source: ClassificationSource,
}

impl Classification {
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            label: IntentLabel::Fallback,
            confidence: 0.0,
            reasoning: reason.into(),
            source: ClassificationSource::Fallback,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("classifier generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("classifier reply is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown intent label '{0}'")]
    UnknownLabel(String),
}

#[derive(Debug, Deserialize)]
struct RawClassification {
    intent: String,
    confidence: Option<f32>,
    reasoning: Option<String>,
}

pub struct IntentClassifier {
    generator: Arc<dyn TextGenerator>,
    history_turns: usize,
}

impl IntentClassifier {
    /// `history_turns` is clamped to 1..=8.
    pub fn new(generator: Arc<dyn TextGenerator>, history_turns: usize) -> Self {
        Self {
            generator,
            history_turns: history_turns.clamp(MIN_HISTORY_TURNS, MAX_HISTORY_TURNS),
        }
    }

    pub async fn classify(&self, ctx: &SessionContext, message: &str) -> Classification {
        match self.try_classify(ctx, message).await {
            Ok(classification) => {
                info!(
                    "Session {}: intent {} (confidence {:.2})",
                    ctx.id(),
                    classification.label.as_str(),
                    classification.confidence
                );
                classification
            }
            Err(e) => {
                warn!("Session {}: {e}; using fallback intent", ctx.id());
                Classification::fallback(e.to_string())
            }
        }
    }

    async fn try_classify(
        &self,
        ctx: &SessionContext,
        message: &str,
    ) -> Result<Classification, ClassificationError> {
        let history = render_history(&ctx.recent_turns(self.history_turns));
        let context = fill_template(
            CLASSIFIER_CONTEXT_TEMPLATE,
            &[
                ("job_title", ctx.job().title()),
                ("history", history.as_str()),
                ("message", message),
                ("json_rule", JSON_ONLY_INSTRUCTION),
            ],
        );

        let reply = self
            .generator
            .generate(CLASSIFIER_INSTRUCTIONS, &context)
            .await?;
        let raw: RawClassification = parse_json_reply(&reply)?;
        let label: IntentLabel = raw.intent.parse()?;

        Ok(Classification {
            label,
            confidence: raw
                .confidence
                .unwrap_or(DEFAULT_CONFIDENCE)
                .clamp(0.0, 1.0),
            reasoning: raw.reasoning.unwrap_or_default(),
            source: ClassificationSource::Model,
        })
    }
}
