//! Shared fixtures for unit tests: a complete sample profile, the sample job
//! target, a scripted text generator and an in-memory profile source.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::conversation::coordinator::TurnCoordinator;
use crate::conversation::intent::IntentClassifier;
use crate::conversation::prompts::CLASSIFIER_INSTRUCTIONS;
use crate::conversation::responders::ResponderRegistry;
use crate::job::fit_scoring::KeywordFitScorer;
use crate::job::keywords::JobTarget;
use crate::llm_client::{GenerationError, TextGenerator};
use crate::profile::models::{EducationEntry, ExperienceEntry, ProfileRecord};
use crate::profile::source::{AcquisitionError, ProfileSource};
use crate::session::context::SessionContext;

pub const ACME_JOB: &str = "Senior Backend Engineer at Acme\n\
Requirements: Rust, PostgreSQL, Kafka and distributed systems.\n\
Responsibilities: design payment APIs and own service reliability.";

pub const DEFAULT_ANSWER: &str = "Here is what I would focus on next.";

pub fn sample_profile() -> ProfileRecord {
    let skills: BTreeSet<String> = [
        "Rust", "Go", "PostgreSQL", "Kafka", "Kubernetes", "Docker", "gRPC", "AWS", "Terraform",
        "Python",
    ]
    .into_iter()
    .map(String::from)
    .collect();

    ProfileRecord {
        name: "Jane Doe".to_string(),
        headline: "Senior Backend Engineer | Rust, Go and distributed systems".to_string(),
        summary: "Backend engineer with 8 years of experience designing reliable APIs and data \
                  pipelines. I have led teams of up to 6 engineers, cut p99 latency by 40% on a \
                  payments API, and enjoy mentoring. Currently focused on event-driven \
                  architecture and developer tooling."
            .to_string(),
        experience: vec![
            ExperienceEntry {
                title: "Backend Engineer".to_string(),
                organization: "Acme Payments".to_string(),
                description: "Built a Kafka-based event pipeline processing 2M events/day and \
                              owned the billing service."
                    .to_string(),
            },
            ExperienceEntry {
                title: "Software Engineer".to_string(),
                organization: "Globex".to_string(),
                description: "Migrated 12 services to Kubernetes and reduced deploy time by 30%."
                    .to_string(),
            },
        ],
        skills,
        education: vec![EducationEntry {
            institution: "State University".to_string(),
            degree: "BSc".to_string(),
            field: Some("Computer Science".to_string()),
        }],
        location: "Berlin".to_string(),
        profile_url: "https://www.linkedin.com/in/jane-doe/".to_string(),
    }
}

pub fn sample_job() -> JobTarget {
    JobTarget::new(ACME_JOB)
}

pub fn sample_session() -> SessionContext {
    SessionContext::new(sample_profile(), sample_job())
}

// ────────────────────────────────────────────────────────────────────────────
// Scripted generator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Script {
    Text(String),
    Fail,
    TimedOut,
}

impl Script {
    fn play(&self) -> Result<String, GenerationError> {
        match self {
            Script::Text(text) => Ok(text.clone()),
            Script::Fail => Err(GenerationError::Api {
                status: 500,
                message: "scripted failure".to_string(),
            }),
            Script::TimedOut => Err(GenerationError::Timeout),
        }
    }
}

/// Answers classifier calls with `classification` and every other call with `answer`.
pub struct ScriptedGenerator {
    classification: Script,
    answer: Script,
    answer_delay: Option<Duration>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedGenerator {
    /// Classifies every message as `label` and answers with `DEFAULT_ANSWER`.
    pub fn classifying(label: &str) -> Self {
        Self {
            classification: Script::Text(format!(
                r#"{{"intent": "{label}", "confidence": 0.9, "reasoning": "scripted"}}"#
            )),
            answer: Script::Text(DEFAULT_ANSWER.to_string()),
            answer_delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_classification(mut self, script: Script) -> Self {
        self.classification = script;
        self
    }

    pub fn with_answer(mut self, script: Script) -> Self {
        self.answer = script;
        self
    }

    pub fn with_answer_delay(mut self, delay: Duration) -> Self {
        self.answer_delay = Some(delay);
        self
    }

    /// Every `(instructions, context)` pair received, in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Contexts of non-classifier calls.
    pub fn responder_contexts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(instructions, _)| instructions != CLASSIFIER_INSTRUCTIONS)
            .map(|(_, context)| context)
            .collect()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, instructions: &str, context: &str) -> Result<String, GenerationError> {
        self.calls
            .lock()
            .unwrap()
            .push((instructions.to_string(), context.to_string()));

        if instructions == CLASSIFIER_INSTRUCTIONS {
            return self.classification.play();
        }
        if let Some(delay) = self.answer_delay {
            tokio::time::sleep(delay).await;
        }
        self.answer.play()
    }
}

pub fn coordinator_with(generator: Arc<ScriptedGenerator>, turn_timeout: Duration) -> TurnCoordinator {
    let classifier = IntentClassifier::new(generator.clone(), 4);
    let responders = ResponderRegistry::new(generator, Arc::new(KeywordFitScorer));
    TurnCoordinator::new(classifier, responders, turn_timeout)
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory profile source
// ────────────────────────────────────────────────────────────────────────────

pub enum StaticProfileSource {
    Found(ProfileRecord),
    Private,
}

#[async_trait]
impl ProfileSource for StaticProfileSource {
    async fn acquire_profile(&self, _profile_url: &str) -> Result<ProfileRecord, AcquisitionError> {
        match self {
            StaticProfileSource::Found(profile) => Ok(profile.clone()),
            StaticProfileSource::Private => Err(AcquisitionError::Private),
        }
    }
}
