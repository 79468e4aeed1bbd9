//! Property tests for the request lifecycle and approval completeness.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use crate::workflow::approval::Role;
use crate::workflow::policy::{PolicyEntry, PolicySnapshot};
use crate::workflow::service::{CandidateRequest, RequestLifecycle, SweepAction};
use crate::workflow::types::RequestStatus;
use feriado_shared::types::PolicyEntryId;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn range_strategy() -> impl Strategy<Value = (NaiveDate, NaiveDate)> {
    (0i64..720, 0i64..30).prop_map(|(offset, len)| {
        let start = base_date() + Duration::days(offset);
        (start, start + Duration::days(len))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Overlap is symmetric in its two ranges.
    #[test]
    fn prop_overlap_symmetric(a in range_strategy(), b in range_strategy()) {
        prop_assert_eq!(
            RequestLifecycle::ranges_overlap(a.0, a.1, b.0, b.1),
            RequestLifecycle::ranges_overlap(b.0, b.1, a.0, a.1)
        );
    }

    /// Every range overlaps itself.
    #[test]
    fn prop_overlap_reflexive(a in range_strategy()) {
        prop_assert!(RequestLifecycle::ranges_overlap(a.0, a.1, a.0, a.1));
    }

    /// The predicate agrees with the set-intersection definition of
    /// inclusive ranges.
    #[test]
    fn prop_overlap_matches_intersection(a in range_strategy(), b in range_strategy()) {
        let intersects = a.0.max(b.0) <= a.1.min(b.1);
        prop_assert_eq!(
            RequestLifecycle::ranges_overlap(a.0, a.1, b.0, b.1),
            intersects
        );
    }

    /// A range abutting another by exactly one day never overlaps.
    #[test]
    fn prop_abutting_never_overlaps(a in range_strategy(), len in 0i64..30) {
        let next_start = a.1 + Duration::days(1);
        let next_end = next_start + Duration::days(len);
        prop_assert!(!RequestLifecycle::ranges_overlap(next_start, next_end, a.0, a.1));
    }

    /// A candidate overlapping any blocking range is rejected; one clear of
    /// all blocking ranges passes validation.
    #[test]
    fn prop_validation_agrees_with_predicate(
        candidate_range in range_strategy(),
        blockers in prop::collection::vec(range_strategy(), 0..5),
    ) {
        let candidate = CandidateRequest {
            start_date: candidate_range.0,
            end_date: candidate_range.1,
            days_requested: 1,
            status: RequestStatus::Pending,
        };

        let should_conflict = blockers.iter().any(|(s, e)| {
            RequestLifecycle::ranges_overlap(candidate.start_date, candidate.end_date, *s, *e)
        });

        let result = RequestLifecycle::validate(&candidate, &blockers);
        prop_assert_eq!(result.is_err(), should_conflict);
    }

    /// Sweeping is idempotent: applying the sweep's own outcome yields no
    /// further action.
    #[test]
    fn prop_sweep_is_idempotent(
        end_offset in -60i64..60,
        status in prop::sample::select(vec![RequestStatus::Approved, RequestStatus::Taken]),
    ) {
        let today = base_date();
        let end_date = today + Duration::days(end_offset);

        if let Some(action) = RequestLifecycle::sweep_action(status, end_date, today) {
            let new_status = match action {
                SweepAction::MarkTaken => RequestStatus::Taken,
                SweepAction::RevertToApproved => RequestStatus::Approved,
            };
            prop_assert_eq!(RequestLifecycle::sweep_action(new_status, end_date, today), None);
        }
    }

    /// Completeness is monotone: adding approvals never un-approves a
    /// fully approved request.
    #[test]
    fn prop_completeness_monotone(
        leader_min in 1u32..4,
        hr_min in 1u32..4,
        leader_count in 0u32..6,
        hr_count in 0u32..6,
        extra in 1u32..3,
    ) {
        let policy = PolicySnapshot::new(vec![
            PolicyEntry {
                id: PolicyEntryId::new(),
                role: Role::Leader,
                required: true,
                order_position: 1,
                minimum_approvals: leader_min,
                active: true,
            },
            PolicyEntry {
                id: PolicyEntryId::new(),
                role: Role::Hr,
                required: true,
                order_position: 2,
                minimum_approvals: hr_min,
                active: true,
            },
        ]);

        let mut counts = BTreeMap::new();
        counts.insert(Role::Leader, leader_count);
        counts.insert(Role::Hr, hr_count);

        if policy.is_fully_approved(&counts) {
            counts.insert(Role::Leader, leader_count + extra);
            prop_assert!(policy.is_fully_approved(&counts));
        }

        // And the definition itself.
        let expected = leader_count >= leader_min && hr_count >= hr_min;
        counts.insert(Role::Leader, leader_count);
        prop_assert_eq!(policy.is_fully_approved(&counts), expected);
    }
}
