use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::conversation::fallback::JOB_FIT_APOLOGY;
use crate::conversation::prompts::{responder_instructions, FIT_SECTION_TEMPLATE, JOB_FIT_ROLE};
use crate::conversation::responders::{build_context, Reply, Responder};
use crate::conversation::router::ResponderId;
use crate::job::fit_scoring::FitScorer;
use crate::llm_client::{GenerationError, TextGenerator};
use crate::session::context::SessionContext;
use crate::session::turn::{StructuredPayload, Turn};

/// Scores the profile against the session's job target and explains the result.
/// The fit report travels with the response as its structured payload.
pub struct JobFit {
    generator: Arc<dyn TextGenerator>,
    fit_scorer: Arc<dyn FitScorer>,
}

impl JobFit {
    pub fn new(generator: Arc<dyn TextGenerator>, fit_scorer: Arc<dyn FitScorer>) -> Self {
        Self {
            generator,
            fit_scorer,
        }
    }
}

#[async_trait]
impl Responder for JobFit {
    fn id(&self) -> ResponderId {
        ResponderId::JobFit
    }

    fn apology(&self) -> &'static str {
        JOB_FIT_APOLOGY
    }

    async fn respond(&self, ctx: &SessionContext, turn: &Turn) -> Result<Reply, GenerationError> {
        let report = self.fit_scorer.score(ctx.profile(), ctx.job());
        debug!(
            "Session {} turn {}: fit score {}/100 ({} backend)",
            ctx.id(),
            turn.sequence(),
            report.percent(),
            report.scorer_backend
        );

        let extra = FIT_SECTION_TEMPLATE.replace("{fit_report}", &report.render());
        let context = build_context(ctx, turn, &extra);
        let text = self
            .generator
            .generate(&responder_instructions(JOB_FIT_ROLE), &context)
            .await?;

        Ok(Reply {
            text,
            payload: Some(StructuredPayload::JobFit(report)),
        })
    }
}
