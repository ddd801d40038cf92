use std::sync::Arc;

use async_trait::async_trait;

use crate::conversation::fallback::PROFILE_ANALYZER_APOLOGY;
use crate::conversation::prompts::{
    responder_instructions, HEALTH_SECTION_TEMPLATE, PROFILE_ANALYZER_ROLE,
};
use crate::conversation::responders::{build_context, Reply, Responder};
use crate::conversation::router::ResponderId;
use crate::llm_client::{GenerationError, TextGenerator};
use crate::profile::health::assess_profile;
use crate::session::context::SessionContext;
use crate::session::turn::Turn;

/// Critiques the profile, anchored in the deterministic section health report.
pub struct ProfileAnalyzer {
    generator: Arc<dyn TextGenerator>,
}

impl ProfileAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl Responder for ProfileAnalyzer {
    fn id(&self) -> ResponderId {
        ResponderId::ProfileAnalyzer
    }

    fn apology(&self) -> &'static str {
        PROFILE_ANALYZER_APOLOGY
    }

    async fn respond(&self, ctx: &SessionContext, turn: &Turn) -> Result<Reply, GenerationError> {
        let health = assess_profile(ctx.profile());
        let extra = HEALTH_SECTION_TEMPLATE.replace("{health}", &health.render());
        let context = build_context(ctx, turn, &extra);

        let text = self
            .generator
            .generate(&responder_instructions(PROFILE_ANALYZER_ROLE), &context)
            .await?;
        Ok(Reply::text(text))
    }
}
