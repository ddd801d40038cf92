//! Turn Coordinator — drives one message through classify → route → generate.
//!
//! Per turn: `Classifying → Routing → Generating → Completed`. The coordinator
//! keeps no state between turns; everything lives in the session's ledger.
//! Every accepted message ends in exactly one completed turn: generation
//! failures become the responder's apology, timeouts become the timeout
//! response, and a dropped turn future is recorded as abandoned by its slot.

use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::conversation::fallback::TIMEOUT_RESPONSE;
use crate::conversation::intent::IntentClassifier;
use crate::conversation::responders::ResponderRegistry;
use crate::conversation::router::route;
use crate::llm_client::GenerationError;
use crate::session::context::{SessionContext, TurnInFlight};
use crate::session::turn::{Completion, Turn, TurnReply};

/// A message that was not accepted as a turn.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TurnError {
    #[error("message cannot be empty")]
    EmptyMessage,

    #[error(transparent)]
    InFlight(#[from] TurnInFlight),
}

pub struct TurnCoordinator {
    classifier: IntentClassifier,
    responders: ResponderRegistry,
    turn_timeout: Duration,
}

impl TurnCoordinator {
    pub fn new(
        classifier: IntentClassifier,
        responders: ResponderRegistry,
        turn_timeout: Duration,
    ) -> Self {
        Self {
            classifier,
            responders,
            turn_timeout,
        }
    }

    /// Runs one turn to completion.
    ///
    /// Returns `Ok(None)` when the finished turn was no longer the session's
    /// in-flight turn; its result is discarded and nothing is emitted.
    pub async fn handle_message(
        &self,
        ctx: &SessionContext,
        message: &str,
    ) -> Result<Option<TurnReply>, TurnError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(TurnError::EmptyMessage);
        }

        let (mut turn, slot) = ctx.begin_turn(message)?;
        info!("Session {} turn {}: accepted", ctx.id(), turn.sequence());

        if tokio::time::timeout(self.turn_timeout, self.run_turn(ctx, &mut turn))
            .await
            .is_err()
        {
            warn!(
                "Session {} turn {}: timed out after {}s in {:?}",
                ctx.id(),
                turn.sequence(),
                self.turn_timeout.as_secs(),
                turn.phase()
            );
            turn.complete(TIMEOUT_RESPONSE, None, Completion::TimedOut);
        }

        match slot.finish(turn) {
            Ok(reply) => {
                info!(
                    "Session {} turn {}: completed ({:?})",
                    ctx.id(),
                    reply.sequence,
                    reply.completion
                );
                Ok(Some(reply))
            }
            Err(stale) => {
                warn!("Session {}: discarding result, {stale}", ctx.id());
                Ok(None)
            }
        }
    }

    async fn run_turn(&self, ctx: &SessionContext, turn: &mut Turn) {
        let classification = self.classifier.classify(ctx, turn.message()).await;
        let label = classification.label;
        turn.record_classification(classification);

        let responder_id = route(label);
        turn.record_responder(responder_id);
        info!(
            "Session {} turn {}: {} -> {}",
            ctx.id(),
            turn.sequence(),
            label.as_str(),
            responder_id.as_str()
        );

        let responder = self.responders.get(responder_id);
        match responder.respond(ctx, turn).await {
            Ok(reply) => turn.complete(reply.text, reply.payload, Completion::Answered),
            Err(GenerationError::Timeout) => {
                warn!(
                    "Session {} turn {}: generation timed out",
                    ctx.id(),
                    turn.sequence()
                );
                turn.complete(TIMEOUT_RESPONSE, None, Completion::TimedOut);
            }
            Err(e) => {
                warn!(
                    "Session {} turn {}: {} failed: {e}",
                    ctx.id(),
                    turn.sequence(),
                    responder.id().as_str()
                );
                turn.complete(responder.apology(), None, Completion::Apology);
            }
        }
    }
}
