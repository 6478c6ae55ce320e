//! Use-case services.
//!
//! # Responsibility
//! - Compose pure reconciliation steps into dashboard views.
//! - Orchestrate node status repository calls with input validation.

pub mod dashboard_service;
pub mod node_status_service;
