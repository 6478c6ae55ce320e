//! Node status repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist per-session roadmap node statuses.
//!
//! # Invariants
//! - At most one row exists per `(session_id, project_id, node_id)`.
//! - Listing is deterministic: `node_id ASC`.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::node_status::{NodeStatus, NodeStatusEntry, SessionId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type NodeStatusRepoResult<T> = Result<T, NodeStatusRepoError>;

const TABLE: &str = "node_statuses";
const COLUMNS: [&str; 5] = ["session_id", "project_id", "node_id", "status", "updated_at"];

#[derive(Debug)]
pub enum NodeStatusRepoError {
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Stored row cannot be converted into a `NodeStatusEntry`.
    InvalidData(String),
}

impl Display for NodeStatusRepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "node status repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "node status repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "node status repository requires column `{column}` in table `{table}`"
            ),
            Self::InvalidData(message) => write!(f, "invalid node status data: {message}"),
        }
    }
}

impl Error for NodeStatusRepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for NodeStatusRepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for NodeStatusRepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for node statuses.
pub trait NodeStatusRepository {
    fn get(
        &self,
        session_id: SessionId,
        project_id: &str,
        node_id: &str,
    ) -> NodeStatusRepoResult<Option<NodeStatusEntry>>;
    /// Inserts or replaces one status and returns the stored row.
    fn set(
        &self,
        session_id: SessionId,
        project_id: &str,
        node_id: &str,
        status: NodeStatus,
    ) -> NodeStatusRepoResult<NodeStatusEntry>;
    /// Removes one status; returns whether a row existed.
    fn delete(
        &self,
        session_id: SessionId,
        project_id: &str,
        node_id: &str,
    ) -> NodeStatusRepoResult<bool>;
    fn list_for_project(
        &self,
        session_id: SessionId,
        project_id: &str,
    ) -> NodeStatusRepoResult<Vec<NodeStatusEntry>>;
    /// Removes every status of one project; returns the removed row count.
    fn clear_project(&self, session_id: SessionId, project_id: &str)
        -> NodeStatusRepoResult<usize>;
}

pub struct SqliteNodeStatusRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNodeStatusRepository<'conn> {
    /// Creates the repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> NodeStatusRepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NodeStatusRepository for SqliteNodeStatusRepository<'_> {
    fn get(
        &self,
        session_id: SessionId,
        project_id: &str,
        node_id: &str,
    ) -> NodeStatusRepoResult<Option<NodeStatusEntry>> {
        let raw = self
            .conn
            .query_row(
                "SELECT session_id, project_id, node_id, status, updated_at
                 FROM node_statuses
                 WHERE session_id = ?1 AND project_id = ?2 AND node_id = ?3;",
                params![session_id.to_string(), project_id, node_id],
                RawEntry::from_row,
            )
            .optional()?;
        raw.map(RawEntry::into_entry).transpose()
    }

    fn set(
        &self,
        session_id: SessionId,
        project_id: &str,
        node_id: &str,
        status: NodeStatus,
    ) -> NodeStatusRepoResult<NodeStatusEntry> {
        self.conn.execute(
            "INSERT INTO node_statuses (session_id, project_id, node_id, status, updated_at)
             VALUES (?1, ?2, ?3, ?4, (strftime('%s', 'now') * 1000))
             ON CONFLICT (session_id, project_id, node_id) DO UPDATE SET
                status = excluded.status,
                updated_at = excluded.updated_at;",
            params![session_id.to_string(), project_id, node_id, status.as_str()],
        )?;

        self.get(session_id, project_id, node_id)?.ok_or_else(|| {
            NodeStatusRepoError::InvalidData(format!(
                "status for node `{node_id}` missing after write"
            ))
        })
    }

    fn delete(
        &self,
        session_id: SessionId,
        project_id: &str,
        node_id: &str,
    ) -> NodeStatusRepoResult<bool> {
        let removed = self.conn.execute(
            "DELETE FROM node_statuses
             WHERE session_id = ?1 AND project_id = ?2 AND node_id = ?3;",
            params![session_id.to_string(), project_id, node_id],
        )?;
        Ok(removed > 0)
    }

    fn list_for_project(
        &self,
        session_id: SessionId,
        project_id: &str,
    ) -> NodeStatusRepoResult<Vec<NodeStatusEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT session_id, project_id, node_id, status, updated_at
             FROM node_statuses
             WHERE session_id = ?1 AND project_id = ?2
             ORDER BY node_id ASC;",
        )?;
        let rows = stmt.query_map(
            params![session_id.to_string(), project_id],
            RawEntry::from_row,
        )?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.into_entry()?);
        }
        Ok(entries)
    }

    fn clear_project(
        &self,
        session_id: SessionId,
        project_id: &str,
    ) -> NodeStatusRepoResult<usize> {
        let removed = self.conn.execute(
            "DELETE FROM node_statuses WHERE session_id = ?1 AND project_id = ?2;",
            params![session_id.to_string(), project_id],
        )?;
        Ok(removed)
    }
}

/// Row as stored, before text columns are validated.
struct RawEntry {
    session_id: String,
    project_id: String,
    node_id: String,
    status: String,
    updated_at: i64,
}

impl RawEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            session_id: row.get(0)?,
            project_id: row.get(1)?,
            node_id: row.get(2)?,
            status: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    fn into_entry(self) -> NodeStatusRepoResult<NodeStatusEntry> {
        let session_id = SessionId::parse_str(&self.session_id).map_err(|_| {
            NodeStatusRepoError::InvalidData(format!(
                "invalid uuid `{}` in session_id",
                self.session_id
            ))
        })?;
        let status = NodeStatus::parse(&self.status).ok_or_else(|| {
            NodeStatusRepoError::InvalidData(format!("unknown status `{}`", self.status))
        })?;
        Ok(NodeStatusEntry {
            session_id,
            project_id: self.project_id,
            node_id: self.node_id,
            status,
            updated_at: self.updated_at,
        })
    }
}

fn ensure_connection_ready(conn: &Connection) -> NodeStatusRepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(NodeStatusRepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, TABLE)? {
        return Err(NodeStatusRepoError::MissingRequiredTable(TABLE));
    }
    for column in COLUMNS {
        if !table_has_column(conn, TABLE, column)? {
            return Err(NodeStatusRepoError::MissingRequiredColumn {
                table: TABLE,
                column,
            });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> NodeStatusRepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> NodeStatusRepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}
