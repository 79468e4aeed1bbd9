//! Country-aware working-day calculation.
//!
//! A date is a working day when its weekday is enabled in the effective
//! work-week mask and it is not a public holiday. The effective mask is the
//! employee's custom mask when it enables at least one day, otherwise the
//! country default.
//!
//! # Modules
//!
//! - `types` - Work-week masks and holiday calendars
//! - `service` - The working-day predicate and range counter

pub mod service;
pub mod types;

pub use service::WorkingCalendar;
pub use types::{HolidayCalendar, WorkWeek};
