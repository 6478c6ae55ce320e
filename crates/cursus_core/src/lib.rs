//! Core logic for the cursus dashboard.
//! Curriculum reconciliation, roadmap diagram layout and node status storage.

pub mod campus;
pub mod catalog;
pub mod db;
pub mod diagram;
pub mod logging;
pub mod model;
pub mod progress;
pub mod reconcile;
pub mod repo;
pub mod service;

pub use campus::{
    decode_campus_records, filter_cursus_records, summarize_records, ProjectStats, RecordError,
};
pub use catalog::{
    available_roadmap_ids, default_curriculum, node_details, roadmap_by_project_id, CatalogError,
    ProjectRoadmap,
};
pub use diagram::{layout_diagram, layout_graph, parse_diagram, Diagram, Layout, LayoutConfig};
pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status};
pub use model::curriculum::{Circle, Curriculum, CurriculumProject};
pub use model::display::{DisplayProject, DisplayStatus};
pub use model::node_status::{NodeStatus, NodeStatusEntry, SessionId};
pub use model::submission::{RawSubmissionRecord, SubmissionStatus};
pub use progress::{compute_progress, ModuleState, ProgressSummary};
pub use reconcile::{filter_by_status, reconcile, status_counts, StatusCounts, StatusFilter};
pub use repo::node_status_repo::{NodeStatusRepository, SqliteNodeStatusRepository};
pub use service::dashboard_service::{Dashboard, DashboardService};
pub use service::node_status_service::{NodeStatusService, NodeStatusServiceError};
