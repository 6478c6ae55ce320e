//! CLI error type wrapping every core error a command can surface.

use cursus_core::campus::RecordError;
use cursus_core::catalog::CatalogError;
use cursus_core::db::DbError;
use cursus_core::repo::node_status_repo::NodeStatusRepoError;
use cursus_core::NodeStatusServiceError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub enum CliError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Logging(String),
    Records(RecordError),
    Catalog(CatalogError),
    Db(DbError),
    Repo(NodeStatusRepoError),
    NodeStatus(NodeStatusServiceError),
    Json(serde_json::Error),
    UnknownRoadmap(String),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
            Self::Records(err) => write!(f, "{err}"),
            Self::Catalog(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::NodeStatus(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "failed to encode output: {err}"),
            Self::UnknownRoadmap(id) => write!(f, "no roadmap for project `{id}`"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Records(err) => Some(err),
            Self::Catalog(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::NodeStatus(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Logging(_) | Self::UnknownRoadmap(_) => None,
        }
    }
}

impl From<RecordError> for CliError {
    fn from(value: RecordError) -> Self {
        Self::Records(value)
    }
}

impl From<CatalogError> for CliError {
    fn from(value: CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<NodeStatusRepoError> for CliError {
    fn from(value: NodeStatusRepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<NodeStatusServiceError> for CliError {
    fn from(value: NodeStatusServiceError) -> Self {
        Self::NodeStatus(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
