//! State tracker
//!
//! Idempotency ledger for inbound messages. Each message id has at most one
//! [`State`]; every transition replaces it (remove then append) in the
//! singleton tracker record.
//!
//! Completed states are kept, not removed, so a redelivered message can be
//! recognised and acknowledged without being processed twice. They are pruned
//! once older than the retention window.
//!
//! The tracker is a single record rewritten on every transition. Two messages
//! processed at the same time can overwrite each other's updates.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::db::schemas::{State, StateStatus, StateTracker, GENERAL_TABLE, STATE_TRACKER_KEY};
use crate::db::{Collection, Store};
use crate::types::{Result, TextMessage};

/// Default retention for completed states
pub const DEFAULT_STATE_RETENTION_HOURS: i64 = 72;

/// Persisted state tracker
#[derive(Clone)]
pub struct StateTrackerService {
    collection: Collection<StateTracker>,
    retention: Duration,
}

impl StateTrackerService {
    pub fn new(store: Arc<dyn Store>, retention: Duration) -> Self {
        Self {
            collection: Collection::new(store, GENERAL_TABLE),
            retention,
        }
    }

    async fn load(&self) -> Result<StateTracker> {
        self.collection.find_or_default(STATE_TRACKER_KEY).await
    }

    async fn record(&self, state: &State) -> Result<()> {
        let mut tracker = self.load().await?;
        tracker.replace(state.clone());

        let pruned = tracker.prune_completed(Utc::now() - self.retention);
        if pruned > 0 {
            debug!(pruned, "pruned completed states");
        }

        self.collection.save(&tracker).await
    }

    /// Current state for a message id
    pub async fn lookup(&self, id: &str) -> Result<Option<State>> {
        Ok(self.load().await?.find(id).cloned())
    }

    /// Start tracking `message`, replacing any earlier state for its id
    pub async fn open(&self, message: &TextMessage, now: DateTime<Utc>) -> Result<State> {
        let state = State::started(message.clone(), now);
        self.record(&state).await?;
        Ok(state)
    }

    /// Record the flow a message was routed to
    pub async fn update_stage(&self, state: &mut State, stage: &str) -> Result<()> {
        state.stage = stage.to_string();
        self.record(state).await
    }

    /// Mark a message as failed with `error`
    pub async fn fail(&self, state: &mut State, error: &str) -> Result<()> {
        state.status = StateStatus::Failed;
        state.error = error.to_string();
        self.record(state).await
    }

    /// Mark a message as completed
    pub async fn complete(&self, state: &mut State) -> Result<()> {
        state.status = StateStatus::Completed;
        state.error.clear();
        self.record(state).await
    }
}
