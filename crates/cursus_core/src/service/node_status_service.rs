//! Roadmap node status use-case service.
//!
//! # Responsibility
//! - Validate ids above the repository layer.
//! - Summarize a session's progress through one roadmap diagram.
//!
//! # Invariants
//! - Project and node ids are trimmed and must not be blank.
//! - Nodes without a stored status read as `NotStarted`.
//! - Skipped nodes are excluded from the progress total.

use crate::catalog::ProjectRoadmap;
use crate::model::node_status::{NodeStatus, NodeStatusEntry, SessionId};
use crate::progress::ProgressSummary;
use crate::repo::node_status_repo::{NodeStatusRepoError, NodeStatusRepository};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum NodeStatusServiceError {
    BlankProjectId,
    BlankNodeId,
    /// Node id is not declared in the roadmap diagram.
    UnknownNode {
        project_id: String,
        node_id: String,
    },
    Repo(NodeStatusRepoError),
}

impl Display for NodeStatusServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankProjectId => write!(f, "project id must not be blank"),
            Self::BlankNodeId => write!(f, "node id must not be blank"),
            Self::UnknownNode {
                project_id,
                node_id,
            } => write!(f, "roadmap `{project_id}` has no node `{node_id}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NodeStatusServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NodeStatusRepoError> for NodeStatusServiceError {
    fn from(value: NodeStatusRepoError) -> Self {
        Self::Repo(value)
    }
}

pub type NodeStatusServiceResult<T> = Result<T, NodeStatusServiceError>;

pub struct NodeStatusService<R: NodeStatusRepository> {
    repo: R,
}

impl<R: NodeStatusRepository> NodeStatusService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Current status of one node, `NotStarted` when nothing is stored.
    pub fn status(
        &self,
        session_id: SessionId,
        project_id: &str,
        node_id: &str,
    ) -> NodeStatusServiceResult<NodeStatus> {
        let (project_id, node_id) = normalize_key(project_id, node_id)?;
        let entry = self.repo.get(session_id, project_id, node_id)?;
        Ok(entry.map_or(NodeStatus::NotStarted, |entry| entry.status))
    }

    pub fn set_status(
        &self,
        session_id: SessionId,
        project_id: &str,
        node_id: &str,
        status: NodeStatus,
    ) -> NodeStatusServiceResult<NodeStatusEntry> {
        let (project_id, node_id) = normalize_key(project_id, node_id)?;
        self.repo
            .set(session_id, project_id, node_id, status)
            .map_err(Into::into)
    }

    /// Like `set_status`, but only for nodes declared in `roadmap`'s diagram.
    pub fn set_roadmap_status(
        &self,
        session_id: SessionId,
        roadmap: &ProjectRoadmap,
        node_id: &str,
        status: NodeStatus,
    ) -> NodeStatusServiceResult<NodeStatusEntry> {
        let (project_id, node_id) = normalize_key(&roadmap.project_id, node_id)?;
        if roadmap.parsed_diagram().node(node_id).is_none() {
            return Err(NodeStatusServiceError::UnknownNode {
                project_id: project_id.to_string(),
                node_id: node_id.to_string(),
            });
        }
        self.set_status(session_id, project_id, node_id, status)
    }

    /// Removes one stored status; returns whether it existed.
    pub fn reset_status(
        &self,
        session_id: SessionId,
        project_id: &str,
        node_id: &str,
    ) -> NodeStatusServiceResult<bool> {
        let (project_id, node_id) = normalize_key(project_id, node_id)?;
        self.repo
            .delete(session_id, project_id, node_id)
            .map_err(Into::into)
    }

    pub fn project_statuses(
        &self,
        session_id: SessionId,
        project_id: &str,
    ) -> NodeStatusServiceResult<Vec<NodeStatusEntry>> {
        let project_id = normalize_project_id(project_id)?;
        self.repo
            .list_for_project(session_id, project_id)
            .map_err(Into::into)
    }

    pub fn clear_project(
        &self,
        session_id: SessionId,
        project_id: &str,
    ) -> NodeStatusServiceResult<usize> {
        let project_id = normalize_project_id(project_id)?;
        self.repo
            .clear_project(session_id, project_id)
            .map_err(Into::into)
    }

    /// Completed diagram nodes against all non-skipped diagram nodes.
    ///
    /// Stored statuses for ids missing from the diagram are ignored.
    pub fn project_progress(
        &self,
        session_id: SessionId,
        roadmap: &ProjectRoadmap,
    ) -> NodeStatusServiceResult<ProgressSummary> {
        let project_id = normalize_project_id(&roadmap.project_id)?;
        let stored = self
            .repo
            .list_for_project(session_id, project_id)?
            .into_iter()
            .map(|entry| (entry.node_id, entry.status))
            .collect::<HashMap<_, _>>();

        let mut completed = 0;
        let mut in_progress = 0;
        let mut total = 0;
        for node in roadmap.parsed_diagram().nodes {
            match stored.get(&node.id).copied().unwrap_or_default() {
                NodeStatus::Skipped => continue,
                NodeStatus::Completed => completed += 1,
                NodeStatus::InProgress => in_progress += 1,
                NodeStatus::NotStarted => {}
            }
            total += 1;
        }
        Ok(ProgressSummary::from_counts(completed, in_progress, total))
    }
}

fn normalize_project_id(project_id: &str) -> NodeStatusServiceResult<&str> {
    let trimmed = project_id.trim();
    if trimmed.is_empty() {
        return Err(NodeStatusServiceError::BlankProjectId);
    }
    Ok(trimmed)
}

fn normalize_key<'a>(
    project_id: &'a str,
    node_id: &'a str,
) -> NodeStatusServiceResult<(&'a str, &'a str)> {
    let project_id = normalize_project_id(project_id)?;
    let node_id = node_id.trim();
    if node_id.is_empty() {
        return Err(NodeStatusServiceError::BlankNodeId);
    }
    Ok((project_id, node_id))
}
