//! Selection configuration applied after `init`.
use derive_setters::Setters;

use crate::{date::CalendarDate, selection::SelectionMode};

/// Mode and initial dates for a picker.
///
/// Building a config has no effect on its own. Pass it to
/// [`CalendarPicker::configure`](crate::picker::CalendarPicker::configure) to
/// compute the resulting selection, then to
/// [`CalendarPicker::apply`](crate::picker::CalendarPicker::apply) to install
/// it.
///
/// # Example
///
/// ```
/// use timesquare::{CalendarDate, SelectionConfig, SelectionMode};
///
/// let start = CalendarDate::new(2024, 1, 5).unwrap();
/// let end = CalendarDate::new(2024, 1, 10).unwrap();
/// let config = SelectionConfig::default()
///     .mode(SelectionMode::Range)
///     .selected_dates(vec![start, end]);
/// assert_eq!(config.selected_dates.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Setters)]
pub struct SelectionConfig {
    /// Selection mode to switch to.
    pub mode: SelectionMode,
    /// Dates to select, in tap order.
    pub selected_dates: Vec<CalendarDate>,
}

impl SelectionConfig {
    /// Replaces the initial dates with `date` alone.
    pub fn selected_date(mut self, date: CalendarDate) -> Self {
        self.selected_dates = vec![date];
        self
    }
}
