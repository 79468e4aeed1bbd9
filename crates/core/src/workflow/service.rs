//! Request validation and state transition logic.
//!
//! All functions are pure: the repository layer loads the current state,
//! asks this module what is allowed, and persists the outcome inside a
//! transaction.

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::workflow::error::WorkflowError;
use crate::workflow::types::RequestStatus;

/// A request being validated for creation (or a pending-state edit).
#[derive(Debug, Clone, Copy)]
pub struct CandidateRequest {
    /// First day off, inclusive.
    pub start_date: NaiveDate,
    /// Last day off, inclusive.
    pub end_date: NaiveDate,
    /// Working-day count computed by the calendar, never user-supplied.
    pub days_requested: u32,
    /// Status the candidate will carry. Historical imports arrive already
    /// `taken`.
    pub status: RequestStatus,
}

/// A field-level validation problem, surfaced to the caller verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "code")]
pub enum ValidationIssue {
    /// `end_date` precedes `start_date`.
    EndBeforeStart,
    /// The range contains no working days.
    NoWorkingDays,
    /// The range overlaps an existing approved-or-taken request.
    OverlapsExisting {
        /// Start of the conflicting request.
        start_date: NaiveDate,
        /// End of the conflicting request.
        end_date: NaiveDate,
    },
}

impl ValidationIssue {
    /// The request field the issue belongs to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EndBeforeStart => "end_date",
            Self::NoWorkingDays | Self::OverlapsExisting { .. } => "start_date",
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndBeforeStart => write!(f, "end date must not precede the start date"),
            Self::NoWorkingDays => write!(f, "the requested range contains no working days"),
            Self::OverlapsExisting {
                start_date,
                end_date,
            } => write!(
                f,
                "overlaps an already approved vacation ({start_date} to {end_date})"
            ),
        }
    }
}

/// The action the time-driven sweep should take on one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepAction {
    /// An approved request whose end date has passed becomes taken.
    MarkTaken,
    /// A taken request whose end date is still ahead reverts to approved
    /// (corrective pass for out-of-order historical edits).
    RevertToApproved,
}

/// Stateless service for request validation and transitions.
pub struct RequestLifecycle;

impl RequestLifecycle {
    /// Inclusive-range overlap test between a candidate `[a_start, a_end]`
    /// and an existing `[b_start, b_end]`: the candidate starts inside the
    /// existing range, ends inside it, or fully contains it.
    #[must_use]
    pub fn ranges_overlap(
        a_start: NaiveDate,
        a_end: NaiveDate,
        b_start: NaiveDate,
        b_end: NaiveDate,
    ) -> bool {
        (b_start <= a_start && b_end >= a_start)
            || (b_start <= a_end && b_end >= a_end)
            || (a_start <= b_start && a_end >= b_end)
    }

    /// Validates a candidate request against its own dates and the
    /// employee's existing approved-or-taken ranges.
    ///
    /// `blocking_ranges` must already be filtered to the same employee's
    /// requests whose status counts as approved, excluding the candidate
    /// itself. A candidate that is already `taken` skips overlap
    /// validation entirely (bulk historical import carve-out).
    ///
    /// # Errors
    ///
    /// Returns every issue found, never just the first.
    pub fn validate(
        candidate: &CandidateRequest,
        blocking_ranges: &[(NaiveDate, NaiveDate)],
    ) -> Result<(), Vec<ValidationIssue>> {
        let mut issues = Vec::new();

        if candidate.end_date < candidate.start_date {
            issues.push(ValidationIssue::EndBeforeStart);
        } else if candidate.days_requested == 0 {
            issues.push(ValidationIssue::NoWorkingDays);
        }

        if candidate.status != RequestStatus::Taken {
            if let Some((start, end)) = blocking_ranges.iter().copied().find(|(start, end)| {
                Self::ranges_overlap(candidate.start_date, candidate.end_date, *start, *end)
            }) {
                issues.push(ValidationIssue::OverlapsExisting {
                    start_date: start,
                    end_date: end,
                });
            }
        }

        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }

    /// Cancellation is permitted only while pending and strictly before the
    /// start date.
    ///
    /// # Errors
    ///
    /// * `WorkflowError::NotPending` - the request has been decided
    /// * `WorkflowError::CannotCancel` - the vacation has already started
    pub fn can_cancel(
        status: RequestStatus,
        start_date: NaiveDate,
        today: NaiveDate,
    ) -> Result<(), WorkflowError> {
        if status != RequestStatus::Pending {
            return Err(WorkflowError::NotPending { status });
        }
        if start_date <= today {
            return Err(WorkflowError::CannotCancel);
        }
        Ok(())
    }

    /// Pending → Approved.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotPending` for any other current status.
    pub fn approve(current: RequestStatus) -> Result<RequestStatus, WorkflowError> {
        match current {
            RequestStatus::Pending => Ok(RequestStatus::Approved),
            status => Err(WorkflowError::NotPending { status }),
        }
    }

    /// Pending → Rejected.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::NotPending` for any other current status.
    pub fn reject(current: RequestStatus) -> Result<RequestStatus, WorkflowError> {
        match current {
            RequestStatus::Pending => Ok(RequestStatus::Rejected),
            status => Err(WorkflowError::NotPending { status }),
        }
    }

    /// Approved → Taken. The only entry into `taken` outside the sweep.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::InvalidTransition` for any other status.
    pub fn mark_taken(current: RequestStatus) -> Result<RequestStatus, WorkflowError> {
        match current {
            RequestStatus::Approved => Ok(RequestStatus::Taken),
            from => Err(WorkflowError::InvalidTransition {
                from,
                to: RequestStatus::Taken,
            }),
        }
    }

    /// Classifies one request for the time-driven maintenance sweep.
    ///
    /// The boundaries are deliberately exclusive of `today` in both
    /// directions so the sweep is idempotent: an approved request ending
    /// today stays approved, a taken request ending today stays taken.
    #[must_use]
    pub fn sweep_action(
        status: RequestStatus,
        end_date: NaiveDate,
        today: NaiveDate,
    ) -> Option<SweepAction> {
        match status {
            RequestStatus::Approved if end_date < today => Some(SweepAction::MarkTaken),
            RequestStatus::Taken if end_date > today => Some(SweepAction::RevertToApproved),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn candidate(start: NaiveDate, end: NaiveDate, days: u32) -> CandidateRequest {
        CandidateRequest {
            start_date: start,
            end_date: end,
            days_requested: days,
            status: RequestStatus::Pending,
        }
    }

    #[test]
    fn test_valid_candidate_passes() {
        let result = RequestLifecycle::validate(
            &candidate(ymd(2024, 9, 9), ymd(2024, 9, 13), 5),
            &[],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_reversed_dates_rejected() {
        let result = RequestLifecycle::validate(
            &candidate(ymd(2024, 9, 13), ymd(2024, 9, 9), 0),
            &[],
        );
        assert_eq!(result.unwrap_err(), vec![ValidationIssue::EndBeforeStart]);
    }

    #[test]
    fn test_zero_working_days_rejected() {
        // A weekend-only range computes to zero days.
        let result = RequestLifecycle::validate(
            &candidate(ymd(2024, 9, 14), ymd(2024, 9, 15), 0),
            &[],
        );
        assert_eq!(result.unwrap_err(), vec![ValidationIssue::NoWorkingDays]);
    }

    #[test]
    fn test_overlap_with_existing_rejected() {
        let existing = (ymd(2024, 9, 11), ymd(2024, 9, 20));
        let result = RequestLifecycle::validate(
            &candidate(ymd(2024, 9, 9), ymd(2024, 9, 13), 5),
            &[existing],
        );
        assert_eq!(
            result.unwrap_err(),
            vec![ValidationIssue::OverlapsExisting {
                start_date: existing.0,
                end_date: existing.1,
            }]
        );
    }

    #[test]
    fn test_abutting_range_accepted() {
        // Existing ends Friday, candidate starts the following Monday.
        let existing = (ymd(2024, 9, 2), ymd(2024, 9, 6));
        let result = RequestLifecycle::validate(
            &candidate(ymd(2024, 9, 9), ymd(2024, 9, 13), 5),
            &[existing],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_taken_candidate_skips_overlap_check() {
        // Bulk historical import carve-out.
        let existing = (ymd(2024, 9, 9), ymd(2024, 9, 13));
        let mut imported = candidate(ymd(2024, 9, 9), ymd(2024, 9, 13), 5);
        imported.status = RequestStatus::Taken;

        assert!(RequestLifecycle::validate(&imported, &[existing]).is_ok());
    }

    #[rstest]
    // candidate starts inside existing
    #[case(ymd(2024, 5, 10), ymd(2024, 5, 20), ymd(2024, 5, 5), ymd(2024, 5, 12), true)]
    // candidate ends inside existing
    #[case(ymd(2024, 5, 1), ymd(2024, 5, 8), ymd(2024, 5, 5), ymd(2024, 5, 12), true)]
    // candidate contains existing
    #[case(ymd(2024, 5, 1), ymd(2024, 5, 31), ymd(2024, 5, 5), ymd(2024, 5, 12), true)]
    // single shared boundary day still overlaps (inclusive ranges)
    #[case(ymd(2024, 5, 12), ymd(2024, 5, 20), ymd(2024, 5, 5), ymd(2024, 5, 12), true)]
    // disjoint before
    #[case(ymd(2024, 4, 1), ymd(2024, 4, 10), ymd(2024, 5, 5), ymd(2024, 5, 12), false)]
    // abutting, one day apart
    #[case(ymd(2024, 5, 13), ymd(2024, 5, 20), ymd(2024, 5, 5), ymd(2024, 5, 12), false)]
    fn test_overlap_predicate(
        #[case] a_start: NaiveDate,
        #[case] a_end: NaiveDate,
        #[case] b_start: NaiveDate,
        #[case] b_end: NaiveDate,
        #[case] expected: bool,
    ) {
        assert_eq!(
            RequestLifecycle::ranges_overlap(a_start, a_end, b_start, b_end),
            expected
        );
    }

    #[test]
    fn test_cancel_only_pending_and_future() {
        let today = ymd(2024, 9, 10);

        assert!(RequestLifecycle::can_cancel(RequestStatus::Pending, ymd(2024, 9, 11), today).is_ok());
        assert!(matches!(
            RequestLifecycle::can_cancel(RequestStatus::Pending, today, today),
            Err(WorkflowError::CannotCancel)
        ));
        assert!(matches!(
            RequestLifecycle::can_cancel(RequestStatus::Approved, ymd(2024, 9, 11), today),
            Err(WorkflowError::NotPending { .. })
        ));
    }

    #[test]
    fn test_approve_and_reject_require_pending() {
        assert_eq!(
            RequestLifecycle::approve(RequestStatus::Pending).unwrap(),
            RequestStatus::Approved
        );
        assert_eq!(
            RequestLifecycle::reject(RequestStatus::Pending).unwrap(),
            RequestStatus::Rejected
        );

        for decided in [
            RequestStatus::Approved,
            RequestStatus::Rejected,
            RequestStatus::Taken,
        ] {
            assert!(matches!(
                RequestLifecycle::approve(decided),
                Err(WorkflowError::NotPending { .. })
            ));
            assert!(matches!(
                RequestLifecycle::reject(decided),
                Err(WorkflowError::NotPending { .. })
            ));
        }
    }

    #[test]
    fn test_mark_taken_only_from_approved() {
        assert_eq!(
            RequestLifecycle::mark_taken(RequestStatus::Approved).unwrap(),
            RequestStatus::Taken
        );
        for other in [
            RequestStatus::Pending,
            RequestStatus::Rejected,
            RequestStatus::Taken,
        ] {
            assert!(matches!(
                RequestLifecycle::mark_taken(other),
                Err(WorkflowError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_sweep_classification() {
        let today = ymd(2024, 9, 10);

        assert_eq!(
            RequestLifecycle::sweep_action(RequestStatus::Approved, ymd(2024, 9, 9), today),
            Some(SweepAction::MarkTaken)
        );
        assert_eq!(
            RequestLifecycle::sweep_action(RequestStatus::Taken, ymd(2024, 9, 11), today),
            Some(SweepAction::RevertToApproved)
        );

        // Boundary day is stable in both directions.
        assert_eq!(
            RequestLifecycle::sweep_action(RequestStatus::Approved, today, today),
            None
        );
        assert_eq!(
            RequestLifecycle::sweep_action(RequestStatus::Taken, today, today),
            None
        );

        // Pending and rejected requests are never swept.
        assert_eq!(
            RequestLifecycle::sweep_action(RequestStatus::Pending, ymd(2024, 9, 1), today),
            None
        );
        assert_eq!(
            RequestLifecycle::sweep_action(RequestStatus::Rejected, ymd(2024, 9, 1), today),
            None
        );
    }
}
