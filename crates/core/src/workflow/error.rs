//! Workflow error types for the vacation request lifecycle.
//!
//! These are the pure rule violations the engine can produce;
//! persistence-level failures (missing rows, database errors) belong to
//! the repository layer.

use thiserror::Error;

use crate::workflow::types::RequestStatus;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Action requires a pending request but the request has been decided.
    #[error("Request is not pending (current status: {status})")]
    NotPending {
        /// The request's current status.
        status: RequestStatus,
    },

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: RequestStatus,
        /// The attempted target status.
        to: RequestStatus,
    },

    /// An employee may not approve their own request.
    #[error("Employees cannot approve their own requests")]
    SelfApproval,

    /// The approver holds no role eligible to approve this request.
    #[error("Employee is not authorized to approve this request")]
    NotAuthorizedToApprove,

    /// Cancellation requires a pending request starting in the future.
    #[error("Request can no longer be cancelled")]
    CannotCancel,
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotPending { .. } | Self::InvalidTransition { .. } | Self::CannotCancel => 422,
            Self::SelfApproval | Self::NotAuthorizedToApprove => 403,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotPending { .. } => "NOT_PENDING",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::SelfApproval => "SELF_APPROVAL",
            Self::NotAuthorizedToApprove => "NOT_AUTHORIZED_TO_APPROVE",
            Self::CannotCancel => "CANNOT_CANCEL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_pending_error() {
        let err = WorkflowError::NotPending {
            status: RequestStatus::Approved,
        };
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "NOT_PENDING");
        assert!(err.to_string().contains("approved"));
    }

    #[test]
    fn test_invalid_transition_error() {
        let err = WorkflowError::InvalidTransition {
            from: RequestStatus::Rejected,
            to: RequestStatus::Taken,
        };
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("rejected"));
        assert!(err.to_string().contains("taken"));
    }

    #[test]
    fn test_authorization_errors_are_forbidden() {
        assert_eq!(WorkflowError::SelfApproval.status_code(), 403);
        assert_eq!(WorkflowError::NotAuthorizedToApprove.status_code(), 403);
        assert_eq!(WorkflowError::SelfApproval.error_code(), "SELF_APPROVAL");
    }

    #[test]
    fn test_cannot_cancel_is_invalid_state() {
        assert_eq!(WorkflowError::CannotCancel.status_code(), 422);
        assert_eq!(WorkflowError::CannotCancel.error_code(), "CANNOT_CANCEL");
    }
}
