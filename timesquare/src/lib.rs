//! Headless calendar date-picker core.
//!
//! `timesquare` lays out a bounded window of dates as months of week rows,
//! tracks a selection in single, multi or range mode, and keeps every cell's
//! display flags in sync with that selection. Rendering and scrolling are left
//! to the host: the picker hands back [`ScrollHint`]s and calls a
//! [`CalendarListener`] whenever a redraw is needed.
//!
//! # Example
//!
//! ```
//! use timesquare::{CalendarDate, CalendarPicker, Locale, SelectionMode, Weekday};
//!
//! let min = CalendarDate::new(2024, 1, 1).unwrap();
//! let max = CalendarDate::new(2024, 3, 1).unwrap();
//! let mut picker = CalendarPicker::init(min, max, Locale::new(Weekday::Monday, min)).unwrap();
//! picker.set_mode(SelectionMode::Range);
//!
//! picker.request_select(CalendarDate::new(2024, 1, 30).unwrap());
//! picker.request_select(CalendarDate::new(2024, 2, 2).unwrap());
//! assert_eq!(picker.selected_dates().len(), 4);
//! ```
pub mod config;
pub mod date;
pub mod error;
pub mod grid;
pub mod locale;
pub mod picker;
pub mod selection;

pub use config::SelectionConfig;
pub use date::{CalendarDate, Weekday, YearMonth, days_in_month, is_leap_year, month_name};
pub use error::{ConfigurationError, DateError};
pub use grid::{
    Bounds, Cell, CellIndex, DAYS_PER_WEEK, Grid, GridBuilder, MAX_YEAR, MIN_YEAR, Month, RangeState,
    Week, classify_cell,
};
pub use locale::{Locale, MonthLabelFormatter, format_month_year};
pub use picker::{
    CalendarEvent, CalendarListener, CalendarPicker, PreparedSelection, ScrollHint,
    SelectOutcome, SelectableDates,
};
pub use selection::{RangeSelection, SelectedEntry, SelectionMode, SelectionState};
