//! Tenure arithmetic on a 360-day commercial year.
//!
//! Worked days are measured with 30-day months and month-end dates
//! normalized to day 30, the convention the payroll side of the business
//! uses. Entitlement accrues at one vacation day per 24 worked days.

use chrono::{Datelike, Days, NaiveDate};

/// Worked days per accrued vacation day.
pub const WORKED_DAYS_PER_VACATION_DAY: i32 = 24;

/// Difference in days between two dates on a 360-day year
/// (twelve 30-day months, day 31 normalized to 30).
#[must_use]
pub fn days_360(start: NaiveDate, end: NaiveDate) -> i32 {
    let start_day = normalize_day(start.day());
    let end_day = normalize_day(end.day());

    (end.year() - start.year()) * 360
        + (end.month() as i32 - start.month() as i32) * 30
        + (end_day - start_day)
}

/// Day-of-month with the 31st folded into the 30th.
fn normalize_day(day: u32) -> i32 {
    if day == 31 { 30 } else { day as i32 }
}

/// Worked days from hire date to the day after `today`, on the 360-day
/// year. An employee hired in the future has worked 0 days.
#[must_use]
pub fn worked_days(hire_date: NaiveDate, today: NaiveDate) -> i32 {
    let reference = today
        .checked_add_days(Days::new(1))
        .unwrap_or(today);

    days_360(hire_date, reference).max(0)
}

/// Accrued vacation entitlement for a worked-day count: integer division
/// by 24, so partial accrual periods do not grant a day.
#[must_use]
pub fn days_to_enjoy(worked_days: i32) -> i32 {
    worked_days.max(0) / WORKED_DAYS_PER_VACATION_DAY
}

/// Whether an employee accrues any entitlement in `year`.
///
/// Employees hired after the ledger year have no balance row at all:
/// entitlement is undefined before hire.
#[must_use]
pub fn accrues_in_year(hire_date: NaiveDate, year: i32) -> bool {
    hire_date.year() <= year
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(ymd(2024, 1, 1), ymd(2024, 1, 1), 0)]
    #[case(ymd(2024, 1, 1), ymd(2024, 2, 1), 30)]
    #[case(ymd(2024, 1, 1), ymd(2025, 1, 1), 360)]
    #[case(ymd(2024, 1, 31), ymd(2024, 2, 1), 1)] // 31st counts as 30th
    #[case(ymd(2024, 1, 1), ymd(2024, 1, 31), 29)]
    #[case(ymd(2024, 2, 28), ymd(2024, 3, 1), 3)] // February is a 30-day month too
    fn test_days_360_cases(#[case] start: NaiveDate, #[case] end: NaiveDate, #[case] expected: i32) {
        assert_eq!(days_360(start, end), expected);
    }

    #[test]
    fn test_worked_days_includes_tomorrow() {
        // Hired exactly one commercial month ago: 30 days through today+1.
        assert_eq!(worked_days(ymd(2024, 8, 1), ymd(2024, 8, 31)), 30);
    }

    #[test]
    fn test_worked_days_future_hire_is_zero() {
        assert_eq!(worked_days(ymd(2030, 1, 1), ymd(2024, 6, 1)), 0);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(23, 0)]
    #[case(24, 1)]
    #[case(360, 15)]
    #[case(720, 30)]
    fn test_days_to_enjoy_accrual(#[case] worked: i32, #[case] expected: i32) {
        assert_eq!(days_to_enjoy(worked), expected);
    }

    #[test]
    fn test_accrues_in_year() {
        assert!(accrues_in_year(ymd(2022, 5, 10), 2024));
        assert!(accrues_in_year(ymd(2024, 12, 31), 2024));
        assert!(!accrues_in_year(ymd(2025, 1, 1), 2024));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// A date is zero commercial days from itself.
        #[test]
        fn prop_days_360_identity(offset in 0i64..20_000) {
            let date = ymd(1990, 1, 1) + chrono::Duration::days(offset);
            prop_assert_eq!(days_360(date, date), 0);
        }

        /// Swapping the arguments negates the result.
        #[test]
        fn prop_days_360_antisymmetric(a in 0i64..20_000, b in 0i64..20_000) {
            let start = ymd(1990, 1, 1) + chrono::Duration::days(a);
            let end = ymd(1990, 1, 1) + chrono::Duration::days(b);
            prop_assert_eq!(days_360(start, end), -days_360(end, start));
        }

        /// Entitlement never exceeds worked days / 24.
        #[test]
        fn prop_entitlement_bounded(worked in 0i32..100_000) {
            let enjoy = days_to_enjoy(worked);
            prop_assert!(enjoy * WORKED_DAYS_PER_VACATION_DAY <= worked);
            prop_assert!((enjoy + 1) * WORKED_DAYS_PER_VACATION_DAY > worked);
        }

        /// Worked days never go negative, whatever the hire date.
        #[test]
        fn prop_worked_days_non_negative(a in 0i64..20_000, b in 0i64..20_000) {
            let hire = ymd(1990, 1, 1) + chrono::Duration::days(a);
            let today = ymd(1990, 1, 1) + chrono::Duration::days(b);
            prop_assert!(worked_days(hire, today) >= 0);
        }
    }
}
