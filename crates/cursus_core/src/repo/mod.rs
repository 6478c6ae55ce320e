//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define data access contracts used by services.
//! - Keep SQL details out of service orchestration.
//!
//! # Invariants
//! - Repositories refuse connections that are not fully migrated.

pub mod node_status_repo;
