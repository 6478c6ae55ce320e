//! Campus submission record model.
//!
//! # Responsibility
//! - Define the validated boundary type for one student project attempt.
//! - Map campus status strings onto a closed set plus an `Other` fallback.
//!
//! # Invariants
//! - Decoding a status string never fails; unknown values become `Other`.
//! - `validated == None` means the attempt has not been graded yet.

use serde::{Deserialize, Serialize};

/// Campus-side lifecycle status of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubmissionStatus {
    Finished,
    InProgress,
    SearchingAGroup,
    CreatingGroup,
    WaitingForCorrection,
    /// Any status value not known to this build (e.g. `parent`).
    Other(String),
}

impl SubmissionStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "finished" => Self::Finished,
            "in_progress" => Self::InProgress,
            "searching_a_group" => Self::SearchingAGroup,
            "creating_group" => Self::CreatingGroup,
            "waiting_for_correction" => Self::WaitingForCorrection,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Finished => "finished",
            Self::InProgress => "in_progress",
            Self::SearchingAGroup => "searching_a_group",
            Self::CreatingGroup => "creating_group",
            Self::WaitingForCorrection => "waiting_for_correction",
            Self::Other(value) => value.as_str(),
        }
    }

    /// Returns whether the attempt is still open on the campus side.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::InProgress
                | Self::SearchingAGroup
                | Self::CreatingGroup
                | Self::WaitingForCorrection
        )
    }
}

impl From<String> for SubmissionStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SubmissionStatus> for String {
    fn from(value: SubmissionStatus) -> Self {
        value.as_str().to_string()
    }
}

/// One student attempt at one project, as reported by the campus API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSubmissionRecord {
    pub id: i64,
    pub slug: String,
    #[serde(default)]
    pub name: String,
    pub status: SubmissionStatus,
    /// `Some(true)` passed, `Some(false)` failed, `None` not graded yet.
    #[serde(default)]
    pub validated: Option<bool>,
    #[serde(default)]
    pub final_mark: Option<i64>,
    #[serde(default)]
    pub marked_at: Option<String>,
    #[serde(default)]
    pub retries_count: u32,
}

impl RawSubmissionRecord {
    /// Creates a record with only the fields reconciliation reads.
    pub fn new(
        id: i64,
        slug: impl Into<String>,
        status: SubmissionStatus,
        validated: Option<bool>,
    ) -> Self {
        Self {
            id,
            slug: slug.into(),
            name: String::new(),
            status,
            validated,
            final_mark: None,
            marked_at: None,
            retries_count: 0,
        }
    }

    /// Finished and validated.
    pub fn is_passed(&self) -> bool {
        self.status == SubmissionStatus::Finished && self.validated == Some(true)
    }

    /// Finished but explicitly not validated.
    pub fn is_failed(&self) -> bool {
        self.status == SubmissionStatus::Finished && self.validated == Some(false)
    }
}
