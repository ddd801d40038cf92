//! Session Context — the profile, the target job and the turn ledger of one session.
//!
//! The ledger holds the transcript of completed turns and the single in-flight
//! slot. It is guarded by a plain mutex that is never held across an await.
//! A turn enters through `begin_turn`, which hands out an `InFlightSlot`; the
//! slot is the only way back into the transcript, and dropping it unfinished
//! records the turn as abandoned so the session never stays pending.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::conversation::fallback::{ABANDONED_RESPONSE, INTERNAL_FAILURE_RESPONSE};
use crate::job::keywords::JobTarget;
use crate::profile::models::ProfileRecord;
use crate::session::turn::{Completion, Turn, TurnReply};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("turn {sequence} is still in flight")]
pub struct TurnInFlight {
    pub sequence: u64,
}

/// A response arrived for a turn that is no longer the in-flight one.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("stale result for turn {sequence} (in flight: {in_flight:?})")]
pub struct StaleResultError {
    pub sequence: u64,
    pub in_flight: Option<u64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("turn {0} in the snapshot has no response")]
    IncompleteTurn(u64),

    #[error("turn {0} in the snapshot is out of sequence")]
    OutOfOrder(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Pending { sequence: u64 },
}

/// The minimal durable record of a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub profile: ProfileRecord,
    pub job: JobTarget,
    pub transcript: Vec<Turn>,
}

#[derive(Debug, Default)]
struct TurnLedger {
    transcript: Vec<Turn>,
    in_flight: Option<u64>,
    last_sequence: u64,
}

#[derive(Debug)]
pub struct SessionContext {
    id: Uuid,
    profile: ProfileRecord,
    job: JobTarget,
    created_at: DateTime<Utc>,
    ledger: Mutex<TurnLedger>,
}

impl SessionContext {
    pub fn new(profile: ProfileRecord, job: JobTarget) -> Self {
        Self {
            id: Uuid::new_v4(),
            profile,
            job,
            created_at: Utc::now(),
            ledger: Mutex::new(TurnLedger::default()),
        }
    }

    /// Rebuilds a live session from a snapshot under a fresh id.
    /// Sequence numbering continues after the last restored turn.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Result<Self, SnapshotError> {
        let mut last_sequence = 0;
        for turn in &snapshot.transcript {
            if !turn.is_complete() {
                return Err(SnapshotError::IncompleteTurn(turn.sequence()));
            }
            if turn.sequence() <= last_sequence {
                return Err(SnapshotError::OutOfOrder(turn.sequence()));
            }
            last_sequence = turn.sequence();
        }

        Ok(Self {
            id: Uuid::new_v4(),
            profile: snapshot.profile,
            job: snapshot.job,
            created_at: Utc::now(),
            ledger: Mutex::new(TurnLedger {
                transcript: snapshot.transcript,
                in_flight: None,
                last_sequence,
            }),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn profile(&self) -> &ProfileRecord {
        &self.profile
    }

    pub fn job(&self) -> &JobTarget {
        &self.job
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> SessionStatus {
        match self.ledger().in_flight {
            Some(sequence) => SessionStatus::Pending { sequence },
            None => SessionStatus::Idle,
        }
    }

    pub fn transcript(&self) -> Vec<Turn> {
        self.ledger().transcript.clone()
    }

    /// The last `n` completed turns, oldest first.
    pub fn recent_turns(&self, n: usize) -> Vec<Turn> {
        let ledger = self.ledger();
        let start = ledger.transcript.len().saturating_sub(n);
        ledger.transcript[start..].to_vec()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            profile: self.profile.clone(),
            job: self.job.clone(),
            transcript: self.transcript(),
        }
    }

    /// Allocates the next sequence number and marks it in flight.
    /// A rejected message does not consume a sequence number.
    pub(crate) fn begin_turn(&self, message: &str) -> Result<(Turn, InFlightSlot<'_>), TurnInFlight> {
        let mut ledger = self.ledger();
        if let Some(sequence) = ledger.in_flight {
            return Err(TurnInFlight { sequence });
        }

        ledger.last_sequence += 1;
        let sequence = ledger.last_sequence;
        ledger.in_flight = Some(sequence);
        drop(ledger);

        debug!("Session {} turn {sequence}: in flight", self.id);
        let slot = InFlightSlot {
            ctx: self,
            sequence,
            message: message.to_string(),
            armed: true,
        };
        Ok((Turn::new(sequence, message), slot))
    }

    /// Appends `turn` and frees the slot, but only if it is the in-flight turn.
    fn finalize(&self, mut turn: Turn) -> Result<TurnReply, StaleResultError> {
        if !turn.is_complete() {
            warn!(
                "Session {} turn {}: finalized without a response",
                self.id,
                turn.sequence()
            );
            turn.complete(INTERNAL_FAILURE_RESPONSE, None, Completion::Apology);
        }

        let mut ledger = self.ledger();
        if ledger.in_flight != Some(turn.sequence()) {
            return Err(StaleResultError {
                sequence: turn.sequence(),
                in_flight: ledger.in_flight,
            });
        }

        let reply = TurnReply::from_turn(&turn);
        ledger.transcript.push(turn);
        ledger.in_flight = None;
        Ok(reply)
    }

    fn ledger(&self) -> MutexGuard<'_, TurnLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Ownership of the in-flight slot for one turn.
#[derive(Debug)]
pub(crate) struct InFlightSlot<'a> {
    ctx: &'a SessionContext,
    sequence: u64,
    message: String,
    armed: bool,
}

impl InFlightSlot<'_> {
    pub fn finish(mut self, turn: Turn) -> Result<TurnReply, StaleResultError> {
        self.armed = false;
        self.ctx.finalize(turn)
    }
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!(
            "Session {} turn {}: dropped before completion, recording as abandoned",
            self.ctx.id, self.sequence
        );
        let mut turn = Turn::new(self.sequence, std::mem::take(&mut self.message));
        turn.complete(ABANDONED_RESPONSE, None, Completion::Abandoned);
        if let Err(e) = self.ctx.finalize(turn) {
            warn!("Session {}: {e}", self.ctx.id);
        }
    }
}
