//! Dashboard assembly from campus records.
//!
//! # Responsibility
//! - Run decode, piscine filtering, reconciliation and counting as one step.
//! - Group reconciled projects by circle for display.
//!
//! # Invariants
//! - Raw-record stats are computed after piscine filtering.
//! - `counts` always describes `projects`, never a filtered view.

use crate::campus::{
    decode_campus_records, filter_cursus_records, summarize_records, ProjectStats, RecordResult,
};
use crate::model::curriculum::Curriculum;
use crate::model::display::DisplayProject;
use crate::model::submission::RawSubmissionRecord;
use crate::reconcile::{
    filter_by_status, reconcile, status_counts, StatusCounts, StatusFilter,
};
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Instant;

/// Reconciled dashboard view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub projects: Vec<DisplayProject>,
    pub counts: StatusCounts,
    pub stats: ProjectStats,
}

impl Dashboard {
    /// Projects accepted by `filter`, in dashboard order.
    pub fn visible(&self, filter: StatusFilter) -> Vec<DisplayProject> {
        filter_by_status(&self.projects, filter)
    }

    /// Projects grouped by circle number.
    pub fn by_circle(&self) -> BTreeMap<u32, Vec<&DisplayProject>> {
        let mut circles: BTreeMap<u32, Vec<&DisplayProject>> = BTreeMap::new();
        for project in &self.projects {
            circles.entry(project.circle).or_default().push(project);
        }
        circles
    }
}

pub struct DashboardService<'a> {
    curriculum: &'a Curriculum,
}

impl<'a> DashboardService<'a> {
    pub fn new(curriculum: &'a Curriculum) -> Self {
        Self { curriculum }
    }

    /// Builds the dashboard from already-decoded records.
    pub fn build(&self, records: Vec<RawSubmissionRecord>) -> Dashboard {
        let started_at = Instant::now();
        let fetched = records.len();
        let records = filter_cursus_records(records);
        let projects = reconcile(self.curriculum, &records);
        let dashboard = Dashboard {
            counts: status_counts(&projects),
            stats: summarize_records(&records),
            projects,
        };

        info!(
            "event=dashboard_build module=service status=ok duration_ms={} records={} cursus_records={} projects={}",
            started_at.elapsed().as_millis(),
            fetched,
            records.len(),
            dashboard.projects.len()
        );
        dashboard
    }

    /// Decodes a campus `projects_users` payload and builds the dashboard.
    pub fn build_from_payload(&self, payload: &str) -> RecordResult<Dashboard> {
        let records = decode_campus_records(payload)?;
        Ok(self.build(records))
    }
}
