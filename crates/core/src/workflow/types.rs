//! Workflow domain types for the vacation request lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Vacation request status.
///
/// Requests progress through these states:
/// - Pending → Approved (all required gates satisfied)
/// - Pending → Rejected (any gate records a rejection; terminal)
/// - Approved → Taken (explicit action, or the scheduled sweep once the
///   end date has passed)
/// - Taken → Approved (sweep corrective pass only, when the end date is
///   still in the future after a historical edit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting approvals.
    Pending,
    /// Fully approved, not yet in the past.
    Approved,
    /// Vetoed by an approver (terminal).
    Rejected,
    /// Approved and already enjoyed; days consumed from the balance.
    Taken,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Taken => "taken",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "taken" => Some(Self::Taken),
            _ => None,
        }
    }

    /// Returns true if this request blocks overlapping requests: for
    /// conflict detection, "approved" includes the taken state.
    #[must_use]
    pub const fn counts_as_approved(&self) -> bool {
        matches!(self, Self::Approved | Self::Taken)
    }

    /// Returns true if the request can still be edited or cancelled.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of one approval record (a filled role slot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    /// Slot created but not yet decided.
    Pending,
    /// Approver signed off.
    Approved,
    /// Approver vetoed; the whole request is rejected.
    Rejected,
}

impl ApprovalStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(RequestStatus::Pending.as_str(), "pending");
        assert_eq!(RequestStatus::Approved.as_str(), "approved");
        assert_eq!(RequestStatus::Rejected.as_str(), "rejected");
        assert_eq!(RequestStatus::Taken.as_str(), "taken");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(RequestStatus::parse("pending"), Some(RequestStatus::Pending));
        assert_eq!(RequestStatus::parse("APPROVED"), Some(RequestStatus::Approved));
        assert_eq!(RequestStatus::parse("Taken"), Some(RequestStatus::Taken));
        assert_eq!(RequestStatus::parse("invalid"), None);
    }

    #[test]
    fn test_counts_as_approved_includes_taken() {
        assert!(RequestStatus::Approved.counts_as_approved());
        assert!(RequestStatus::Taken.counts_as_approved());
        assert!(!RequestStatus::Pending.counts_as_approved());
        assert!(!RequestStatus::Rejected.counts_as_approved());
    }

    #[test]
    fn test_only_pending_is_editable() {
        assert!(RequestStatus::Pending.is_editable());
        assert!(!RequestStatus::Approved.is_editable());
        assert!(!RequestStatus::Rejected.is_editable());
        assert!(!RequestStatus::Taken.is_editable());
    }

    #[test]
    fn test_approval_status_round_trip() {
        for status in [
            ApprovalStatus::Pending,
            ApprovalStatus::Approved,
            ApprovalStatus::Rejected,
        ] {
            assert_eq!(ApprovalStatus::parse(status.as_str()), Some(status));
        }
    }
}
