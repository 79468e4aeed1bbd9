//! Work-week masks and holiday calendars.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// A seven-day work-week mask, Monday through Sunday.
///
/// Serializes as a named-field map so clients and storage see
/// `{"monday": true, ...}` rather than a positional array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkWeek {
    /// Monday is a working day.
    pub monday: bool,
    /// Tuesday is a working day.
    pub tuesday: bool,
    /// Wednesday is a working day.
    pub wednesday: bool,
    /// Thursday is a working day.
    pub thursday: bool,
    /// Friday is a working day.
    pub friday: bool,
    /// Saturday is a working day.
    pub saturday: bool,
    /// Sunday is a working day.
    pub sunday: bool,
}

impl WorkWeek {
    /// The standard Monday-to-Friday work-week.
    pub const MONDAY_TO_FRIDAY: Self = Self {
        monday: true,
        tuesday: true,
        wednesday: true,
        thursday: true,
        friday: true,
        saturday: false,
        sunday: false,
    };

    /// A mask with no working days. Not a valid effective mask; used to
    /// represent "no custom override" on an employee.
    pub const EMPTY: Self = Self {
        monday: false,
        tuesday: false,
        wednesday: false,
        thursday: false,
        friday: false,
        saturday: false,
        sunday: false,
    };

    /// Returns true if the given weekday is enabled.
    #[must_use]
    pub const fn allows(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// Returns true if no day is enabled.
    ///
    /// An empty mask is not a valid override; effective-mask resolution
    /// falls back to the country default.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !(self.monday
            || self.tuesday
            || self.wednesday
            || self.thursday
            || self.friday
            || self.saturday
            || self.sunday)
    }

    /// Number of enabled days in the week.
    #[must_use]
    pub fn working_days_in_week(&self) -> u32 {
        [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
            self.sunday,
        ]
        .iter()
        .filter(|d| **d)
        .count() as u32
    }

    /// Resolves the effective mask for an employee: the custom mask when it
    /// enables at least one day, otherwise the country default.
    #[must_use]
    pub fn effective(custom: Option<Self>, country_default: Self) -> Self {
        match custom {
            Some(mask) if !mask.is_empty() => mask,
            _ => country_default,
        }
    }
}

impl Default for WorkWeek {
    fn default() -> Self {
        Self::MONDAY_TO_FRIDAY
    }
}

/// A set of public-holiday dates for one country, covering at least the
/// current and next year so a request may span a year boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Creates an empty calendar (a country without a holiday key).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a calendar from a list of holiday dates.
    #[must_use]
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// Returns true if the date is a public holiday.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// Number of holidays in the calendar.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns true if the calendar has no holidays.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Iterates the holiday dates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.dates.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_is_monday_to_friday() {
        let week = WorkWeek::default();
        assert!(week.monday && week.friday);
        assert!(!week.saturday && !week.sunday);
        assert_eq!(week.working_days_in_week(), 5);
    }

    #[rstest]
    #[case(Weekday::Mon, true)]
    #[case(Weekday::Tue, true)]
    #[case(Weekday::Wed, true)]
    #[case(Weekday::Thu, true)]
    #[case(Weekday::Fri, true)]
    #[case(Weekday::Sat, false)]
    #[case(Weekday::Sun, false)]
    fn test_monday_to_friday_allows(#[case] weekday: Weekday, #[case] expected: bool) {
        assert_eq!(WorkWeek::MONDAY_TO_FRIDAY.allows(weekday), expected);
    }

    #[test]
    fn test_empty_mask_is_empty() {
        assert!(WorkWeek::EMPTY.is_empty());
        assert_eq!(WorkWeek::EMPTY.working_days_in_week(), 0);
        assert!(!WorkWeek::MONDAY_TO_FRIDAY.is_empty());
    }

    #[test]
    fn test_effective_prefers_non_empty_custom() {
        let custom = WorkWeek {
            saturday: true,
            ..WorkWeek::EMPTY
        };
        let effective = WorkWeek::effective(Some(custom), WorkWeek::MONDAY_TO_FRIDAY);
        assert_eq!(effective, custom);
    }

    #[test]
    fn test_effective_falls_back_on_empty_custom() {
        let effective = WorkWeek::effective(Some(WorkWeek::EMPTY), WorkWeek::MONDAY_TO_FRIDAY);
        assert_eq!(effective, WorkWeek::MONDAY_TO_FRIDAY);

        let effective = WorkWeek::effective(None, WorkWeek::MONDAY_TO_FRIDAY);
        assert_eq!(effective, WorkWeek::MONDAY_TO_FRIDAY);
    }

    #[test]
    fn test_holiday_calendar_contains() {
        let christmas = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        let calendar = HolidayCalendar::from_dates([christmas]);

        assert!(calendar.contains(christmas));
        assert!(!calendar.contains(NaiveDate::from_ymd_opt(2024, 12, 26).unwrap()));
        assert_eq!(calendar.len(), 1);
    }

    #[test]
    fn test_holiday_calendar_deduplicates() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let calendar = HolidayCalendar::from_dates([date, date]);
        assert_eq!(calendar.len(), 1);
    }

    #[test]
    fn test_workweek_serde_named_fields() {
        let json = serde_json::to_value(WorkWeek::MONDAY_TO_FRIDAY).unwrap();
        assert_eq!(json["monday"], true);
        assert_eq!(json["sunday"], false);
    }
}
