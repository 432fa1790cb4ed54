//! Locale inputs injected at grid construction.
use derive_setters::Setters;

use crate::{
    date::{CalendarDate, Weekday, YearMonth},
    grid::DAYS_PER_WEEK,
};

/// Formats the label of a month header.
pub type MonthLabelFormatter = fn(YearMonth) -> String;

/// Week start, "today" and month label formatting.
///
/// Nothing here is read from the system implicitly except through
/// [`Locale::system`], so grids built in tests are deterministic.
#[derive(Debug, Clone, Copy, Setters)]
pub struct Locale {
    /// First day of each rendered week.
    pub first_day_of_week: Weekday,
    /// Date flagged as today.
    pub today: CalendarDate,
    /// Formatter used for [`Month::label`](crate::grid::Month::label).
    pub month_label: MonthLabelFormatter,
}

impl Locale {
    /// Sunday-first weeks with today's UTC date.
    pub fn system() -> Self {
        Self::new(Weekday::Sunday, CalendarDate::today())
    }

    /// Creates a locale with the default "`<Month> <year>`" labels.
    pub fn new(first_day_of_week: Weekday, today: CalendarDate) -> Self {
        Self {
            first_day_of_week,
            today,
            month_label: format_month_year,
        }
    }

    /// Weekdays in column order.
    pub fn weekday_sequence(&self) -> [Weekday; DAYS_PER_WEEK] {
        let mut days = [Weekday::Monday; DAYS_PER_WEEK];
        let start = self.first_day_of_week.index_from_monday();
        for (idx, slot) in days.iter_mut().enumerate() {
            *slot = Weekday::from_monday_index(start + idx as i32);
        }
        days
    }

    /// Number of days to step back from `date` to reach the week start.
    pub fn offset_from_week_start(&self, date: CalendarDate) -> i64 {
        (date.weekday().index_from_monday() - self.first_day_of_week.index_from_monday())
            .rem_euclid(7) as i64
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::system()
    }
}

/// Default month label, e.g. `January 2024`.
pub fn format_month_year(month: YearMonth) -> String {
    month.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u8, d: u8) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    #[test]
    fn test_weekday_sequence_starts_at_first_day() {
        let locale = Locale::new(Weekday::Sunday, date(2024, 1, 1));
        assert_eq!(
            locale.weekday_sequence(),
            [
                Weekday::Sunday,
                Weekday::Monday,
                Weekday::Tuesday,
                Weekday::Wednesday,
                Weekday::Thursday,
                Weekday::Friday,
                Weekday::Saturday,
            ]
        );
    }

    #[test]
    fn test_offset_from_week_start() {
        // 2024-01-01 is a Monday.
        let monday = date(2024, 1, 1);
        let sunday_first = Locale::new(Weekday::Sunday, monday);
        let monday_first = Locale::new(Weekday::Monday, monday);
        let saturday_first = Locale::new(Weekday::Saturday, monday);
        assert_eq!(sunday_first.offset_from_week_start(monday), 1);
        assert_eq!(monday_first.offset_from_week_start(monday), 0);
        assert_eq!(saturday_first.offset_from_week_start(monday), 2);
    }

    #[test]
    fn test_custom_month_label() {
        fn numeric(month: YearMonth) -> String {
            format!("{:02}/{}", month.month(), month.year())
        }
        let locale = Locale::new(Weekday::Monday, date(2024, 1, 1)).month_label(numeric);
        let label = (locale.month_label)(YearMonth::new(2024, 3).unwrap());
        assert_eq!(label, "03/2024");
        assert_eq!(
            format_month_year(YearMonth::new(2024, 3).unwrap()),
            "March 2024"
        );
    }
}
