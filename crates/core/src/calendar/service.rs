//! The working-day predicate and business-day counter.

use chrono::{Datelike, Days, NaiveDate};

use crate::calendar::types::{HolidayCalendar, WorkWeek};

/// A resolved calendar for one employee: effective work-week mask plus the
/// public-holiday calendar of the employee's country.
#[derive(Debug, Clone)]
pub struct WorkingCalendar {
    week: WorkWeek,
    holidays: HolidayCalendar,
}

impl WorkingCalendar {
    /// Creates a calendar from an already-effective mask and holidays.
    #[must_use]
    pub const fn new(week: WorkWeek, holidays: HolidayCalendar) -> Self {
        Self { week, holidays }
    }

    /// Resolves an employee's calendar: the custom mask wins only when it
    /// enables at least one day, otherwise the country default applies.
    #[must_use]
    pub fn for_employee(
        custom_mask: Option<WorkWeek>,
        country_mask: WorkWeek,
        holidays: HolidayCalendar,
    ) -> Self {
        Self::new(WorkWeek::effective(custom_mask, country_mask), holidays)
    }

    /// The effective work-week mask backing this calendar.
    #[must_use]
    pub const fn week(&self) -> WorkWeek {
        self.week
    }

    /// Returns true if `date` is a working day: its weekday is enabled in
    /// the effective mask and it is not a public holiday.
    #[must_use]
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.week.allows(date.weekday()) && !self.holidays.contains(date)
    }

    /// Counts working days in the inclusive range `[start, end]`.
    ///
    /// Returns 0 immediately when `start > end`.
    #[must_use]
    pub fn count_working_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        if start > end {
            return 0;
        }

        let mut count = 0;
        let mut current = start;
        while current <= end {
            if self.is_working_day(current) {
                count += 1;
            }
            let Some(next) = current.checked_add_days(Days::new(1)) else {
                break;
            };
            current = next;
        }

        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekdays_only() -> WorkingCalendar {
        WorkingCalendar::new(WorkWeek::MONDAY_TO_FRIDAY, HolidayCalendar::empty())
    }

    #[test]
    fn test_reversed_range_counts_zero() {
        let calendar = weekdays_only();
        assert_eq!(
            calendar.count_working_days(ymd(2024, 9, 13), ymd(2024, 9, 9)),
            0
        );
    }

    #[test]
    fn test_monday_to_friday_week_counts_five() {
        // 2024-09-09 is a Monday, 2024-09-13 the Friday of the same week.
        let calendar = weekdays_only();
        assert_eq!(
            calendar.count_working_days(ymd(2024, 9, 9), ymd(2024, 9, 13)),
            5
        );
    }

    #[test]
    fn test_weekend_only_range_counts_zero() {
        let calendar = weekdays_only();
        assert_eq!(
            calendar.count_working_days(ymd(2024, 9, 14), ymd(2024, 9, 15)),
            0
        );
    }

    #[test]
    fn test_holiday_excluded_from_count() {
        let holiday = ymd(2024, 9, 11); // Wednesday
        let calendar = WorkingCalendar::new(
            WorkWeek::MONDAY_TO_FRIDAY,
            HolidayCalendar::from_dates([holiday]),
        );

        assert!(!calendar.is_working_day(holiday));
        assert_eq!(
            calendar.count_working_days(ymd(2024, 9, 9), ymd(2024, 9, 13)),
            4
        );
    }

    #[test]
    fn test_weekend_holiday_does_not_double_subtract() {
        let saturday = ymd(2024, 9, 14);
        let calendar = WorkingCalendar::new(
            WorkWeek::MONDAY_TO_FRIDAY,
            HolidayCalendar::from_dates([saturday]),
        );
        assert_eq!(
            calendar.count_working_days(ymd(2024, 9, 9), ymd(2024, 9, 15)),
            5
        );
    }

    #[test]
    fn test_range_spanning_year_boundary() {
        let new_year = ymd(2025, 1, 1);
        let calendar = WorkingCalendar::new(
            WorkWeek::MONDAY_TO_FRIDAY,
            HolidayCalendar::from_dates([new_year]),
        );

        // 2024-12-30 (Mon) .. 2025-01-03 (Fri), Jan 1 is a holiday.
        assert_eq!(
            calendar.count_working_days(ymd(2024, 12, 30), ymd(2025, 1, 3)),
            4
        );
    }

    #[test]
    fn test_custom_saturday_mask() {
        let custom = WorkWeek {
            saturday: true,
            ..WorkWeek::EMPTY
        };
        let calendar = WorkingCalendar::for_employee(
            Some(custom),
            WorkWeek::MONDAY_TO_FRIDAY,
            HolidayCalendar::empty(),
        );

        // Full week 2024-09-09..15 contains exactly one Saturday.
        assert_eq!(
            calendar.count_working_days(ymd(2024, 9, 9), ymd(2024, 9, 15)),
            1
        );
    }

    #[test]
    fn test_empty_custom_mask_falls_back_to_country() {
        let calendar = WorkingCalendar::for_employee(
            Some(WorkWeek::EMPTY),
            WorkWeek::MONDAY_TO_FRIDAY,
            HolidayCalendar::empty(),
        );
        assert_eq!(calendar.week(), WorkWeek::MONDAY_TO_FRIDAY);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Count never exceeds the number of days in the range.
        #[test]
        fn prop_count_bounded_by_range_length(
            offset in 0i64..3000,
            len in 0u64..60,
        ) {
            let start = ymd(2020, 1, 1) + chrono::Duration::days(offset);
            let end = start + chrono::Duration::days(len as i64);
            let calendar = weekdays_only();

            let count = calendar.count_working_days(start, end);
            prop_assert!(u64::from(count) <= len + 1);
        }

        /// Any full calendar week counts exactly the mask's enabled days
        /// when no holidays apply.
        #[test]
        fn prop_full_week_counts_mask_days(
            offset in 0i64..3000,
            monday in any::<bool>(),
            tuesday in any::<bool>(),
            wednesday in any::<bool>(),
            saturday in any::<bool>(),
        ) {
            let week = WorkWeek {
                monday,
                tuesday,
                wednesday,
                thursday: true,
                friday: false,
                saturday,
                sunday: false,
            };
            // Snap to a Monday so the range covers each weekday exactly once.
            let start = ymd(2024, 9, 9) + chrono::Duration::days(offset * 7);
            let end = start + chrono::Duration::days(6);

            let calendar = WorkingCalendar::new(week, HolidayCalendar::empty());
            prop_assert_eq!(
                calendar.count_working_days(start, end),
                week.working_days_in_week()
            );
        }

        /// Counting is additive over adjacent ranges.
        #[test]
        fn prop_count_additive_over_split(
            offset in 0i64..3000,
            len in 1u64..40,
            split in 0u64..40,
        ) {
            let split = split.min(len - 1);
            let start = ymd(2021, 6, 1) + chrono::Duration::days(offset);
            let end = start + chrono::Duration::days(len as i64);
            let mid = start + chrono::Duration::days(split as i64);

            let calendar = weekdays_only();
            let whole = calendar.count_working_days(start, end);
            let left = calendar.count_working_days(start, mid);
            let right = calendar.count_working_days(mid + chrono::Duration::days(1), end);

            prop_assert_eq!(whole, left + right);
        }
    }
}
