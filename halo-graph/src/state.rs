//! Per-turn working state of the conversation graph.

use halo_core::{Redaction, Turn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Working state threaded through every node of one turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphState {
    pub session_id: String,
    pub channel: String,
    /// Oldest first. Retrieved memories, if any, come before persisted turns.
    pub conversation_history: Vec<Turn>,
    /// Masked user text.
    pub user_query: String,
    pub current_task: Option<String>,
    pub user_profile: HashMap<String, Value>,
    pub sentiment_score: f64,
    pub handoff_to_human: bool,
    pub locale: Option<String>,
    pub pii_redactions: Vec<Redaction>,
    pub detected_language: Option<String>,
    pub assistant_response: Option<String>,
}

impl GraphState {
    pub fn new(session_id: impl Into<String>, channel: impl Into<String>) -> Self {
        Self { session_id: session_id.into(), channel: channel.into(), ..Default::default() }
    }

    pub fn with_user_query(mut self, query: impl Into<String>) -> Self {
        self.user_query = query.into();
        self
    }

    /// The response, if one has been set and is not blank.
    pub fn response(&self) -> Option<&str> {
        self.assistant_response.as_deref().filter(|r| !r.trim().is_empty())
    }

    /// Merge `update` into this state. Fields left unset in the update are
    /// kept.
    pub fn apply(&mut self, update: StateUpdate) {
        let StateUpdate {
            conversation_history,
            current_task,
            sentiment_score,
            handoff_to_human,
            detected_language,
            assistant_response,
        } = update;

        if let Some(history) = conversation_history {
            self.conversation_history = history;
        }
        if let Some(task) = current_task {
            self.current_task = Some(task);
        }
        if let Some(score) = sentiment_score {
            self.sentiment_score = score;
        }
        if let Some(handoff) = handoff_to_human {
            self.handoff_to_human = handoff;
        }
        if let Some(lang) = detected_language {
            self.detected_language = Some(lang);
        }
        if let Some(response) = assistant_response {
            self.assistant_response = Some(response);
        }
    }
}

/// Partial state written by one node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub conversation_history: Option<Vec<Turn>>,
    pub current_task: Option<String>,
    pub sentiment_score: Option<f64>,
    pub handoff_to_human: Option<bool>,
    pub detected_language: Option<String>,
    pub assistant_response: Option<String>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation_history(mut self, history: Vec<Turn>) -> Self {
        self.conversation_history = Some(history);
        self
    }

    pub fn current_task(mut self, task: impl Into<String>) -> Self {
        self.current_task = Some(task.into());
        self
    }

    pub fn sentiment_score(mut self, score: f64) -> Self {
        self.sentiment_score = Some(score);
        self
    }

    pub fn handoff_to_human(mut self, handoff: bool) -> Self {
        self.handoff_to_human = Some(handoff);
        self
    }

    pub fn detected_language(mut self, lang: impl Into<String>) -> Self {
        self.detected_language = Some(lang.into());
        self
    }

    pub fn assistant_response(mut self, response: impl Into<String>) -> Self {
        self.assistant_response = Some(response.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Checkpoint data structure for persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Thread identifier
    pub thread_id: String,
    /// Unique checkpoint ID
    pub checkpoint_id: String,
    /// State after the step
    pub state: GraphState,
    /// Step number
    pub step: usize,
    /// Nodes executed in this step
    pub executed_nodes: Vec<String>,
    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Checkpoint {
    /// Create a new checkpoint
    pub fn new(thread_id: &str, state: GraphState, step: usize, executed_nodes: Vec<String>) -> Self {
        Self {
            thread_id: thread_id.to_string(),
            checkpoint_id: uuid::Uuid::new_v4().to_string(),
            state,
            step,
            executed_nodes,
            created_at: chrono::Utc::now(),
        }
    }
}
