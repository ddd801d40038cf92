//! Responders — one per `ResponderId`, each producing the response for a routed turn.
//!
//! A responder reads the session context and the turn; it never writes to either.
//! The coordinator records whatever it returns into the turn.

pub mod career_coach;
pub mod content_enhancer;
pub mod job_fit;
pub mod profile_analyzer;

use std::sync::Arc;

use async_trait::async_trait;

use crate::conversation::prompts::{fill_template, RESPONDER_CONTEXT_TEMPLATE};
use crate::conversation::render::{render_history, render_job, render_profile};
use crate::conversation::router::ResponderId;
use crate::job::fit_scoring::FitScorer;
use crate::llm_client::{GenerationError, TextGenerator};
use crate::session::context::SessionContext;
use crate::session::turn::{StructuredPayload, Turn};

pub use career_coach::CareerCoach;
pub use content_enhancer::ContentEnhancer;
pub use job_fit::JobFit;
pub use profile_analyzer::ProfileAnalyzer;

/// Completed turns shown to a responder.
const RESPONDER_HISTORY_TURNS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub payload: Option<StructuredPayload>,
}

impl Reply {
    pub fn text(text: String) -> Self {
        Self {
            text,
            payload: None,
        }
    }
}

#[async_trait]
pub trait Responder: Send + Sync {
    fn id(&self) -> ResponderId;

    /// User-facing text used when generation fails.
    fn apology(&self) -> &'static str;

    async fn respond(&self, ctx: &SessionContext, turn: &Turn) -> Result<Reply, GenerationError>;
}

/// Fills the shared responder context template with responder-specific `extra` context.
pub(crate) fn build_context(ctx: &SessionContext, turn: &Turn, extra: &str) -> String {
    let profile = render_profile(ctx.profile());
    let job = render_job(ctx.job());
    let history = render_history(&ctx.recent_turns(RESPONDER_HISTORY_TURNS));
    fill_template(
        RESPONDER_CONTEXT_TEMPLATE,
        &[
            ("profile", profile.as_str()),
            ("job", job.as_str()),
            ("history", history.as_str()),
            ("extra", extra),
            ("question", turn.message()),
        ],
    )
}

/// One instance of every responder, resolved by id.
pub struct ResponderRegistry {
    profile_analyzer: ProfileAnalyzer,
    job_fit: JobFit,
    content_enhancer: ContentEnhancer,
    career_coach: CareerCoach,
}

impl ResponderRegistry {
    pub fn new(generator: Arc<dyn TextGenerator>, fit_scorer: Arc<dyn FitScorer>) -> Self {
        Self {
            profile_analyzer: ProfileAnalyzer::new(generator.clone()),
            job_fit: JobFit::new(generator.clone(), fit_scorer.clone()),
            content_enhancer: ContentEnhancer::new(generator.clone()),
            career_coach: CareerCoach::new(generator, fit_scorer),
        }
    }

    pub fn get(&self, id: ResponderId) -> &dyn Responder {
        match id {
            ResponderId::ProfileAnalyzer => &self.profile_analyzer,
            ResponderId::JobFit => &self.job_fit,
            ResponderId::ContentEnhancer => &self.content_enhancer,
            ResponderId::CareerCoach => &self.career_coach,
        }
    }
}
