use serde::{Deserialize, Serialize};

use crate::conversation::intent::IntentLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponderId {
    ProfileAnalyzer,
    JobFit,
    ContentEnhancer,
    CareerCoach,
}

impl ResponderId {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponderId::ProfileAnalyzer => "profile_analyzer",
            ResponderId::JobFit => "job_fit",
            ResponderId::ContentEnhancer => "content_enhancer",
            ResponderId::CareerCoach => "career_coach",
        }
    }
}

/// Static routing table. Exhaustive over `IntentLabel`, so every label has a responder.
pub const fn route(label: IntentLabel) -> ResponderId {
    match label {
        IntentLabel::ProfileAnalysis => ResponderId::ProfileAnalyzer,
        IntentLabel::JobFit => ResponderId::JobFit,
        IntentLabel::ContentEnhancement => ResponderId::ContentEnhancer,
        IntentLabel::CareerGuidance => ResponderId::CareerCoach,
        IntentLabel::Fallback => ResponderId::CareerCoach,
    }
}
