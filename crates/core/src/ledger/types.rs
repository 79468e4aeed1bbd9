//! The balance snapshot and its canonical formula.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::tenure;

/// One employee-year balance, fully derived from tenure and the employee's
/// request history.
///
/// The canonical availability formula is
/// `days_available = days_to_enjoy - used_days - days_scheduled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Worked days on the 360-day commercial year, hire date to today+1.
    pub worked_days: i32,
    /// Accrued entitlement: `worked_days / 24`.
    pub days_to_enjoy: i32,
    /// Sum of requested-day counts over `approved` requests.
    pub days_scheduled: i32,
    /// Sum of requested-day counts over `taken` requests.
    pub used_days: i32,
    /// `days_to_enjoy - used_days - days_scheduled`. May go negative when
    /// historical imports exceed accrual; surfaced as-is, never clamped.
    pub days_available: i32,
}

impl BalanceSnapshot {
    /// Computes a snapshot from tenure and the two request sums.
    ///
    /// This is a pure, idempotent derivation: recomputing with the same
    /// inputs always yields the same snapshot.
    #[must_use]
    pub fn compute(
        hire_date: NaiveDate,
        today: NaiveDate,
        days_scheduled: i32,
        used_days: i32,
    ) -> Self {
        let worked_days = tenure::worked_days(hire_date, today);
        let days_to_enjoy = tenure::days_to_enjoy(worked_days);

        Self {
            worked_days,
            days_to_enjoy,
            days_scheduled,
            used_days,
            days_available: days_to_enjoy - used_days - days_scheduled,
        }
    }

    /// Applies a consumption update: the request's days move from
    /// scheduled to used, so availability is unchanged as long as the
    /// request was counted as scheduled.
    ///
    /// Scheduled days clamp at zero: a request approved after the last
    /// recalculation may not be reflected in `days_scheduled` yet, and the
    /// next full recalculation reconciles the sums anyway.
    #[must_use]
    pub fn after_consumption(mut self, days_requested: i32) -> Self {
        self.used_days += days_requested;
        self.days_scheduled = (self.days_scheduled - days_requested).max(0);
        self.days_available = self.days_to_enjoy - self.used_days - self.days_scheduled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_one_year_of_tenure_grants_fifteen_days() {
        // 360 worked days / 24 = 15.
        let snapshot = BalanceSnapshot::compute(ymd(2023, 6, 1), ymd(2024, 5, 31), 0, 0);
        assert_eq!(snapshot.worked_days, 360);
        assert_eq!(snapshot.days_to_enjoy, 15);
        assert_eq!(snapshot.days_available, 15);
    }

    #[test]
    fn test_scheduled_and_used_reduce_availability() {
        let snapshot = BalanceSnapshot::compute(ymd(2022, 1, 1), ymd(2024, 1, 1), 5, 3);
        assert_eq!(
            snapshot.days_available,
            snapshot.days_to_enjoy - 3 - 5
        );
    }

    #[test]
    fn test_availability_can_go_negative() {
        let snapshot = BalanceSnapshot::compute(ymd(2024, 1, 1), ymd(2024, 2, 1), 0, 20);
        assert!(snapshot.days_available < 0);
    }

    #[test]
    fn test_consumption_moves_scheduled_to_used() {
        let before = BalanceSnapshot::compute(ymd(2022, 1, 1), ymd(2024, 1, 1), 4, 0);
        let after = before.after_consumption(4);

        assert_eq!(after.used_days, 4);
        assert_eq!(after.days_scheduled, 0);
        // Moving scheduled days to used leaves availability unchanged.
        assert_eq!(after.days_available, before.days_available);
    }

    #[test]
    fn test_consumption_clamps_scheduled_at_zero() {
        let before = BalanceSnapshot::compute(ymd(2022, 1, 1), ymd(2024, 1, 1), 2, 0);
        let after = before.after_consumption(5);

        assert_eq!(after.used_days, 5);
        assert_eq!(after.days_scheduled, 0);
        assert_eq!(
            after.days_available,
            after.days_to_enjoy - after.used_days - after.days_scheduled
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Recomputation with unchanged inputs is byte-identical.
        #[test]
        fn prop_compute_is_idempotent(
            hire in 0i64..15_000,
            today in 0i64..15_000,
            scheduled in 0i32..60,
            used in 0i32..60,
        ) {
            let hire = ymd(1995, 1, 1) + chrono::Duration::days(hire);
            let today = ymd(1995, 1, 1) + chrono::Duration::days(today);

            let first = BalanceSnapshot::compute(hire, today, scheduled, used);
            let second = BalanceSnapshot::compute(hire, today, scheduled, used);
            prop_assert_eq!(first, second);
        }

        /// The canonical formula always holds.
        #[test]
        fn prop_availability_formula(
            hire in 0i64..15_000,
            today in 0i64..15_000,
            scheduled in 0i32..60,
            used in 0i32..60,
        ) {
            let hire = ymd(1995, 1, 1) + chrono::Duration::days(hire);
            let today = ymd(1995, 1, 1) + chrono::Duration::days(today);

            let snapshot = BalanceSnapshot::compute(hire, today, scheduled, used);
            prop_assert_eq!(
                snapshot.days_available,
                snapshot.days_to_enjoy - snapshot.used_days - snapshot.days_scheduled
            );
        }
    }
}
