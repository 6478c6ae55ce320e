//! Per-session roadmap node status.
//!
//! # Invariants
//! - Storage form is one of `not_started|in_progress|completed|skipped`.
//! - An entry is addressed by `(session_id, project_id, node_id)`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Browser-session identifier that scopes node statuses.
pub type SessionId = Uuid;

/// Learner-chosen state of one roadmap node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Skipped,
}

impl NodeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
        }
    }

    /// Parses the storage form; `-` is accepted in place of `_`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "not_started" => Some(Self::NotStarted),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "skipped" => Some(Self::Skipped),
            _ => None,
        }
    }
}

impl Display for NodeStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored status of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatusEntry {
    pub session_id: SessionId,
    pub project_id: String,
    pub node_id: String,
    pub status: NodeStatus,
    /// Epoch ms of the last write.
    pub updated_at: i64,
}
