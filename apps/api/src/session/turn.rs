//! Turn — one user message and the single response it produces.
//!
//! Fields are private: only the coordinator (through the `pub(crate)` mutators)
//! advances a turn, and a completed turn ignores further writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::conversation::intent::{Classification, IntentLabel};
use crate::conversation::responders::career_coach::CareerPlan;
use crate::conversation::router::ResponderId;
use crate::job::fit_scoring::FitReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    Classifying,
    Routing,
    Generating,
    Completed,
}

/// How a completed turn got its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    Answered,
    Apology,
    TimedOut,
    Abandoned,
}

/// Responder-specific structured data attached to a response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StructuredPayload {
    JobFit(FitReport),
    CareerPlan(CareerPlan),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    sequence: u64,
    message: String,
    phase: TurnPhase,
    classification: Option<Classification>,
    responder: Option<ResponderId>,
    response: Option<String>,
    payload: Option<StructuredPayload>,
    completion: Option<Completion>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl Turn {
    pub(crate) fn new(sequence: u64, message: impl Into<String>) -> Self {
        Self {
            sequence,
            message: message.into(),
            phase: TurnPhase::Classifying,
            classification: None,
            responder: None,
            response: None,
            payload: None,
            completion: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn label(&self) -> Option<IntentLabel> {
        self.classification.as_ref().map(|c| c.label)
    }

    pub fn responder(&self) -> Option<ResponderId> {
        self.responder
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn completion(&self) -> Option<Completion> {
        self.completion
    }

    pub fn is_complete(&self) -> bool {
        self.phase == TurnPhase::Completed
    }

    /// Classifying → Routing.
    pub(crate) fn record_classification(&mut self, classification: Classification) {
        if self.reject_write("classification") {
            return;
        }
        self.classification = Some(classification);
        self.phase = TurnPhase::Routing;
    }

    /// Routing → Generating.
    pub(crate) fn record_responder(&mut self, responder: ResponderId) {
        if self.reject_write("responder") {
            return;
        }
        self.responder = Some(responder);
        self.phase = TurnPhase::Generating;
    }

    /// Any phase → Completed. Exactly one response is ever recorded.
    pub(crate) fn complete(
        &mut self,
        response: impl Into<String>,
        payload: Option<StructuredPayload>,
        completion: Completion,
    ) {
        if self.reject_write("response") {
            return;
        }
        self.response = Some(response.into());
        self.payload = payload;
        self.completion = Some(completion);
        self.phase = TurnPhase::Completed;
        self.completed_at = Some(Utc::now());
    }

    fn reject_write(&self, field: &str) -> bool {
        if self.is_complete() {
            warn!(
                "Ignoring {field} write to completed turn {}",
                self.sequence
            );
        }
        self.is_complete()
    }
}

/// The result emitted to the caller for one accepted message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnReply {
    pub sequence: u64,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<StructuredPayload>,
    pub intent: Option<IntentLabel>,
    pub responder: Option<ResponderId>,
    pub completion: Completion,
}

impl TurnReply {
    /// Builds the reply for a completed turn. A running turn reads as abandoned.
    pub fn from_turn(turn: &Turn) -> Self {
        Self {
            sequence: turn.sequence,
            response: turn.response.clone().unwrap_or_default(),
            payload: turn.payload.clone(),
            intent: turn.label(),
            responder: turn.responder,
            completion: turn.completion.unwrap_or(Completion::Abandoned),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::intent::ClassificationSource;

    fn classification(label: IntentLabel) -> Classification {
        Classification {
            label,
            confidence: 0.9,
            reasoning: "test".to_string(),
            source: ClassificationSource::Model,
        }
    }

    #[test]
    fn test_turn_advances_through_phases() {
        let mut turn = Turn::new(1, "How well do I fit?");
        assert_eq!(turn.phase(), TurnPhase::Classifying);

        turn.record_classification(classification(IntentLabel::JobFit));
        assert_eq!(turn.phase(), TurnPhase::Routing);
        assert_eq!(turn.label(), Some(IntentLabel::JobFit));

        turn.record_responder(ResponderId::JobFit);
        assert_eq!(turn.phase(), TurnPhase::Generating);

        turn.complete("You fit well.", None, Completion::Answered);
        assert!(turn.is_complete());
        assert!(turn.completed_at.is_some());
        assert_eq!(turn.response(), Some("You fit well."));
    }

    #[test]
    fn test_completed_turn_is_immutable() {
        let mut turn = Turn::new(3, "hello");
        turn.complete("first", None, Completion::Answered);
        turn.complete("second", None, Completion::Apology);
        turn.record_responder(ResponderId::CareerCoach);

        assert_eq!(turn.response(), Some("first"));
        assert_eq!(turn.completion(), Some(Completion::Answered));
        assert_eq!(turn.responder(), None);
    }

    #[test]
    fn test_reply_reflects_completed_turn() {
        let mut turn = Turn::new(2, "hi");
        turn.complete("hello", None, Completion::TimedOut);
        let reply = TurnReply::from_turn(&turn);
        assert_eq!(reply.sequence, 2);
        assert_eq!(reply.completion, Completion::TimedOut);
        assert_eq!(reply.intent, None);
    }

    #[test]
    fn test_turn_serde_round_trip_keeps_private_state() {
        let mut turn = Turn::new(5, "Rewrite my headline");
        turn.record_classification(classification(IntentLabel::ContentEnhancement));
        turn.record_responder(ResponderId::ContentEnhancer);
        turn.complete("Option 1: ...", None, Completion::Answered);

        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains("\"completion\":\"answered\""));
        let back: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(back, turn);
    }
}
