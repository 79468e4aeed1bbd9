//! Vacation request workflow for Feriado.
//!
//! This module implements the request lifecycle state machine, the
//! configurable approval policy, and the approval eligibility engine.
//!
//! # Modules
//!
//! - `types` - Workflow domain types (RequestStatus, ApprovalStatus)
//! - `error` - Workflow-specific error types
//! - `policy` - Configurable per-role approval gates
//! - `approval` - Roles, role sets, and the approval eligibility engine
//! - `service` - Request validation and state transition logic

pub mod approval;
pub mod error;
pub mod policy;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use approval::{ApprovalEngine, ApproverFacts, RequestFacts, Role, RoleSet};
pub use error::WorkflowError;
pub use policy::{PolicyEntry, PolicySnapshot};
pub use service::{CandidateRequest, RequestLifecycle, SweepAction, ValidationIssue};
pub use types::{ApprovalStatus, RequestStatus};
