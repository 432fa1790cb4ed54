//! Error types for the timesquare crate.
//!
//! Configuration problems are programmer errors and surface as `Err`.
//! Rejected taps are ordinary user input and are reported through
//! [`CalendarEvent`](crate::picker::CalendarEvent) instead.
use thiserror::Error;

use crate::date::CalendarDate;

/// Errors produced while constructing or parsing dates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// Month outside 1..=12.
    #[error("invalid month: {month} (must be 1..=12)")]
    InvalidMonth {
        /// The rejected month.
        month: u8,
    },
    /// Day outside the month's length.
    #[error("invalid day {day} for {year:04}-{month:02} (max {max_day})")]
    InvalidDay {
        /// Year of the rejected date.
        year: i32,
        /// Month of the rejected date.
        month: u8,
        /// The rejected day.
        day: u8,
        /// Length of that month.
        max_day: u8,
    },
    /// Text that is not `YYYY-MM-DD`.
    #[error("{0:?} is not a YYYY-MM-DD date")]
    Parse(String),
    /// Text that does not name a weekday.
    #[error("{0:?} is not a weekday")]
    UnknownWeekday(String),
}

/// Fatal configuration errors raised by `init` and by selection
/// configuration.
///
/// No partially built state is left behind: on error the picker keeps
/// whatever it held before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// `min` is after `max`.
    #[error("minDate must be before maxDate (minDate: {min}, maxDate: {max})")]
    InvalidRange {
        /// Requested lower bound.
        min: CalendarDate,
        /// Requested exclusive upper bound.
        max: CalendarDate,
    },
    /// Single mode was given more than one initial date.
    #[error("single selection mode can't be used with {count} selected dates")]
    SingleModeMultipleDates {
        /// Number of dates supplied.
        count: usize,
    },
    /// Mode text did not name a selection mode.
    #[error("unknown selection mode {0:?}")]
    UnknownMode(String),
    /// An initial date lies outside `[min, max)`.
    #[error("selected date {date} must be between {min} and {max}")]
    DateOutOfBounds {
        /// The rejected date.
        date: CalendarDate,
        /// Inclusive lower bound.
        min: CalendarDate,
        /// Exclusive upper bound.
        max: CalendarDate,
    },
    /// A bound falls in a year the grid cannot pad with neighbouring days.
    #[error("date {date} is outside the supported years ({min_year}..={max_year})")]
    YearOutOfRange {
        /// The rejected bound.
        date: CalendarDate,
        /// Earliest supported year.
        min_year: i32,
        /// Latest supported year.
        max_year: i32,
    },
    /// A prepared selection was applied after the grid was rebuilt.
    #[error("selection was prepared for a grid that has since been rebuilt")]
    StaleSelection,
}
