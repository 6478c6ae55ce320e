//! Display-ready project projection.
//!
//! # Invariants
//! - `DisplayStatus` ordering is `Completed < InProgress < Failed < Upcoming`.
//! - `progress` is only set for multi-part projects that are in progress.

use crate::model::curriculum::CurriculumProject;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Derived status shown on a project card.
///
/// Variant order is the within-circle sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayStatus {
    Completed,
    InProgress,
    Failed,
    Upcoming,
}

impl DisplayStatus {
    pub const ALL: [DisplayStatus; 4] = [
        DisplayStatus::Completed,
        DisplayStatus::InProgress,
        DisplayStatus::Failed,
        DisplayStatus::Upcoming,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "in-progress",
            Self::Failed => "failed",
            Self::Upcoming => "upcoming",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "completed" => Some(Self::Completed),
            "in-progress" | "in_progress" => Some(Self::InProgress),
            "failed" => Some(Self::Failed),
            "upcoming" => Some(Self::Upcoming),
            _ => None,
        }
    }
}

impl Display for DisplayStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One curriculum project enriched with the student's derived status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayProject {
    pub id: String,
    pub name: String,
    pub description: String,
    pub difficulty: u8,
    pub skills: Vec<String>,
    pub circle: u32,
    pub is_exam: bool,
    pub status: DisplayStatus,
    /// Percentage of completed submodules, set while a multi-part project is in progress.
    pub progress: Option<u32>,
    pub final_mark: Option<i64>,
    /// Campus slug whose record decided the status.
    pub matched_slug: Option<String>,
}

impl DisplayProject {
    /// Builds an `upcoming` projection with no campus data attached.
    pub fn from_project(project: &CurriculumProject) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            difficulty: project.difficulty,
            skills: project.skills.clone(),
            circle: project.circle,
            is_exam: project.is_exam,
            status: DisplayStatus::Upcoming,
            progress: None,
            final_mark: None,
            matched_slug: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DisplayStatus;

    #[test]
    fn status_order_matches_card_sorting() {
        let mut statuses = vec![
            DisplayStatus::Upcoming,
            DisplayStatus::Failed,
            DisplayStatus::Completed,
            DisplayStatus::InProgress,
        ];
        statuses.sort();
        assert_eq!(statuses, DisplayStatus::ALL.to_vec());
    }

    #[test]
    fn status_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_value(DisplayStatus::InProgress).unwrap();
        assert_eq!(json, "in-progress");
        assert_eq!(DisplayStatus::parse("IN_PROGRESS"), Some(DisplayStatus::InProgress));
        assert_eq!(DisplayStatus::parse("skipped"), None);
    }
}
