//! State tracker document
//!
//! Singleton record holding one [`State`] per inbound message currently known
//! to the relay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::TextMessage;

/// Key of the state tracker record in the general table
pub const STATE_TRACKER_KEY: &str = "StateTracker";

/// Processing status of one inbound message
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateStatus {
    #[serde(rename = "IN PROGRESS")]
    InProgress,
    #[serde(rename = "FAILED")]
    Failed,
    #[serde(rename = "COMPLETED")]
    Completed,
}

/// Processing record for one inbound message
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct State {
    /// Inbound message id
    pub id: String,

    pub status: StateStatus,

    /// Route label, e.g. `SIGN UP`
    #[serde(default)]
    pub stage: String,

    #[serde(default)]
    pub error: String,

    pub time_start: DateTime<Utc>,

    pub message: TextMessage,
}

impl State {
    pub fn started(message: TextMessage, now: DateTime<Utc>) -> Self {
        Self {
            id: message.request_id.clone(),
            status: StateStatus::InProgress,
            stage: String::new(),
            error: String::new(),
            time_start: now,
            message,
        }
    }
}

/// State tracker document
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct StateTracker {
    /// Record key, always [`STATE_TRACKER_KEY`]
    pub name: String,

    #[serde(default)]
    pub states: Vec<State>,
}

impl Default for StateTracker {
    fn default() -> Self {
        Self {
            name: STATE_TRACKER_KEY.to_string(),
            states: Vec::new(),
        }
    }
}

impl StateTracker {
    pub fn find(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    /// Remove every record for `id`, then append `state`
    pub fn replace(&mut self, state: State) {
        self.states.retain(|s| s.id != state.id);
        self.states.push(state);
    }

    /// Drop completed records that started before `cutoff`. Returns how many
    /// were dropped.
    pub fn prune_completed(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.states.len();
        self.states
            .retain(|s| !(s.status == StateStatus::Completed && s.time_start < cutoff));
        before - self.states.len()
    }
}
