//! Progress aggregation for multi-part projects.
//!
//! # Responsibility
//! - Count completed numbered submodules of one project.
//! - Derive per-submodule states from campus records.
//!
//! # Invariants
//! - Only keys `<base>-NN` with `NN < module_count` are counted.
//! - `percentage` is `round(100 * completed / total)` and `0` when `total == 0`.

use crate::model::curriculum::module_slug;
use crate::model::submission::{RawSubmissionRecord, SubmissionStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// State of one numbered submodule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleState {
    NotStarted,
    InProgress,
    Completed,
}

impl ModuleState {
    /// Classifies one submodule record.
    ///
    /// `finished` + validated counts as completed; `in_progress` or
    /// `finished` + not validated counts as in progress.
    pub fn from_record(record: &RawSubmissionRecord) -> Self {
        if record.is_passed() {
            Self::Completed
        } else if record.status == SubmissionStatus::InProgress || record.is_failed() {
            Self::InProgress
        } else {
            Self::NotStarted
        }
    }
}

/// Aggregated submodule counts for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub completed: u32,
    pub in_progress: u32,
    pub total: u32,
    pub percentage: u32,
}

impl ProgressSummary {
    /// Builds a summary from raw counts, applying the rounding rule.
    pub fn from_counts(completed: u32, in_progress: u32, total: u32) -> Self {
        Self {
            completed,
            in_progress,
            total,
            percentage: rounded_percentage(completed, total),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }

    pub fn is_started(&self) -> bool {
        self.completed > 0 || self.in_progress > 0
    }
}

/// Aggregates submodule states into completed/total/percentage.
///
/// `states` is keyed by campus submodule slug (`<base>-NN`).
pub fn compute_progress(
    base_slug: &str,
    module_count: u32,
    states: &HashMap<String, ModuleState>,
) -> ProgressSummary {
    let mut completed = 0;
    let mut in_progress = 0;
    for index in 0..module_count {
        match states.get(&module_slug(base_slug, index)) {
            Some(ModuleState::Completed) => completed += 1,
            Some(ModuleState::InProgress) => in_progress += 1,
            Some(ModuleState::NotStarted) | None => {}
        }
    }
    ProgressSummary::from_counts(completed, in_progress, module_count)
}

/// Derives submodule states for `<base>-NN` records.
///
/// Records outside the submodule range are ignored; for duplicate slugs the
/// last record wins.
pub fn module_states_from_records<'a, I>(
    base_slug: &str,
    module_count: u32,
    records: I,
) -> HashMap<String, ModuleState>
where
    I: IntoIterator<Item = &'a RawSubmissionRecord>,
{
    let wanted = (0..module_count)
        .map(|index| module_slug(base_slug, index))
        .collect::<Vec<_>>();

    let mut states = HashMap::new();
    for record in records {
        if wanted.iter().any(|slug| slug == &record.slug) {
            states.insert(record.slug.clone(), ModuleState::from_record(record));
        }
    }
    states
}

/// `round(100 * part / total)` with half-up rounding; `0` for an empty total.
pub fn rounded_percentage(part: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let part = u64::from(part);
    let total = u64::from(total);
    ((200 * part + total) / (2 * total)) as u32
}
