//! Curriculum reconciliation.
//!
//! # Responsibility
//! - Match campus submission records onto the authored curriculum.
//! - Derive one display status per curriculum project.
//! - Provide the status filters and counters used by dashboard views.
//!
//! # Invariants
//! - Output has exactly one entry per curriculum project.
//! - Output order depends only on circle and status, never on record order.
//! - No input makes reconciliation fail; unknown statuses map to `upcoming`.

use crate::model::curriculum::{Curriculum, CurriculumProject};
use crate::model::display::{DisplayProject, DisplayStatus};
use crate::model::submission::{RawSubmissionRecord, SubmissionStatus};
use crate::progress::{compute_progress, module_states_from_records};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

type SlugIndex<'a> = HashMap<&'a str, &'a RawSubmissionRecord>;

/// Reconciles campus records against the curriculum.
///
/// Results are sorted by circle, then by status
/// (`completed < in-progress < failed < upcoming`), keeping declaration
/// order for ties.
pub fn reconcile(
    curriculum: &Curriculum,
    raw_records: &[RawSubmissionRecord],
) -> Vec<DisplayProject> {
    // Later records overwrite earlier ones for duplicate slugs.
    let by_slug: SlugIndex<'_> = raw_records
        .iter()
        .map(|record| (record.slug.as_str(), record))
        .collect();

    let mut projects = curriculum
        .projects()
        .map(|project| reconcile_project(project, &by_slug, raw_records))
        .collect::<Vec<_>>();
    projects.sort_by_key(|project| (project.circle, project.status));

    debug!(
        "event=reconcile module=reconcile status=ok projects={} records={} matched={}",
        projects.len(),
        raw_records.len(),
        projects
            .iter()
            .filter(|project| project.status != DisplayStatus::Upcoming)
            .count()
    );
    projects
}

fn reconcile_project(
    project: &CurriculumProject,
    by_slug: &SlugIndex<'_>,
    raw_records: &[RawSubmissionRecord],
) -> DisplayProject {
    let mut display = DisplayProject::from_project(project);

    if let Some(module_count) = project.module_count {
        let base = project.module_base_slug();
        let states = module_states_from_records(base, module_count, raw_records);
        let summary = compute_progress(base, module_count, &states);

        display.status = if summary.is_complete() {
            DisplayStatus::Completed
        } else if summary.is_started() {
            DisplayStatus::InProgress
        } else {
            DisplayStatus::Upcoming
        };
        if display.status == DisplayStatus::InProgress {
            display.progress = Some(summary.percentage);
        }
        if display.status != DisplayStatus::Upcoming {
            display.matched_slug = Some(base.to_string());
        }
        return display;
    }

    let matched = std::iter::once(&project.slug)
        .chain(project.alt_slugs.iter())
        .find_map(|slug| by_slug.get(slug.as_str()).copied());

    if let Some(record) = matched {
        display.status = status_for_record(record);
        display.final_mark = record.final_mark;
        display.matched_slug = Some(record.slug.clone());
    }
    display
}

/// Maps one single-part record to its display status.
pub fn status_for_record(record: &RawSubmissionRecord) -> DisplayStatus {
    if record.is_passed() {
        DisplayStatus::Completed
    } else if record.status.is_active() {
        DisplayStatus::InProgress
    } else if record.status == SubmissionStatus::Finished {
        DisplayStatus::Failed
    } else {
        DisplayStatus::Upcoming
    }
}

/// Status selector for dashboard filter pills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(DisplayStatus),
}

impl StatusFilter {
    /// Parses `all` or any display status string.
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        DisplayStatus::parse(value).map(Self::Only)
    }

    pub fn accepts(self, status: DisplayStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

/// Keeps projects accepted by `filter`, preserving order.
pub fn filter_by_status(projects: &[DisplayProject], filter: StatusFilter) -> Vec<DisplayProject> {
    projects
        .iter()
        .filter(|project| filter.accepts(project.status))
        .cloned()
        .collect()
}

/// Per-status counts over reconciled projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub all: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub failed: usize,
    pub upcoming: usize,
}

impl StatusCounts {
    pub fn get(&self, filter: StatusFilter) -> usize {
        match filter {
            StatusFilter::All => self.all,
            StatusFilter::Only(DisplayStatus::Completed) => self.completed,
            StatusFilter::Only(DisplayStatus::InProgress) => self.in_progress,
            StatusFilter::Only(DisplayStatus::Failed) => self.failed,
            StatusFilter::Only(DisplayStatus::Upcoming) => self.upcoming,
        }
    }
}

pub fn status_counts(projects: &[DisplayProject]) -> StatusCounts {
    let mut counts = StatusCounts {
        all: projects.len(),
        ..StatusCounts::default()
    };
    for project in projects {
        match project.status {
            DisplayStatus::Completed => counts.completed += 1,
            DisplayStatus::InProgress => counts.in_progress += 1,
            DisplayStatus::Failed => counts.failed += 1,
            DisplayStatus::Upcoming => counts.upcoming += 1,
        }
    }
    counts
}
