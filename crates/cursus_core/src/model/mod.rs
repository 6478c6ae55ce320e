//! Domain model for curriculum reconciliation.
//!
//! # Responsibility
//! - Define the authored curriculum shape (circles and projects).
//! - Define the campus submission record boundary type.
//! - Define the derived, display-ready project projection.
//! - Define per-session roadmap node statuses.
//!
//! # Invariants
//! - Circles are totally ordered by `number`.
//! - Every project belongs to exactly one circle.
//! - Unknown submission statuses are preserved, never rejected.

pub mod curriculum;
pub mod display;
pub mod node_status;
pub mod submission;
