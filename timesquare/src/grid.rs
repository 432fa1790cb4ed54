//! Month/week/day grid construction and per-cell classification.
//!
//! ## Layout
//!
//! A [`Grid`] holds two parallel arrays: the [`Month`] descriptors and, at the
//! same index, that month's weeks. Every week has exactly seven [`Cell`]s and
//! may include leading or trailing days of the neighbouring months; only
//! cells with `is_current_month` belong to the month they are listed under.
//!
//! Cells are addressed by [`CellIndex`]. Selections store indices rather than
//! references, so updating a cell's annotations in place is visible to every
//! holder of its index.
//!
//! ## Reannotation
//!
//! The grid layout is fixed once built. After a selection change only the
//! annotations are recomputed, by running [`classify_cell`] over every cell.
use std::{
    collections::BTreeSet,
    sync::atomic::{AtomicU64, Ordering},
};

use tracing::debug;

use crate::{
    date::{CalendarDate, YearMonth},
    error::ConfigurationError,
    locale::Locale,
    selection::SelectionState,
};

/// Number of cells in a week row.
pub const DAYS_PER_WEEK: usize = 7;

/// Earliest year a bound may fall in.
pub const MIN_YEAR: i32 = i32::MIN + 1;
/// Latest year a bound may fall in.
pub const MAX_YEAR: i32 = i32::MAX - 1;

static NEXT_GRID_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Position of a date within a selected range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RangeState {
    /// Not part of a multi-date span.
    #[default]
    None,
    /// The earliest selected date.
    First,
    /// Strictly between the earliest and latest selected dates.
    Middle,
    /// The latest selected date.
    Last,
}

/// One day in the grid together with its display and selection flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// The day this cell shows.
    pub date: CalendarDate,
    /// Whether the day belongs to the month the cell is listed under.
    pub is_current_month: bool,
    /// Whether the day can be tapped.
    pub is_selectable: bool,
    /// Whether the day is part of the current selection.
    pub is_selected: bool,
    /// Whether the day is today.
    pub is_today: bool,
    /// Day of month shown in the cell.
    pub day_value: u8,
    /// Position within a multi-date span.
    pub range_state: RangeState,
}

/// Seven consecutive days.
pub type Week = [Cell; DAYS_PER_WEEK];

/// Descriptor of one month in the grid. Identity is (month, year).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Month {
    year_month: YearMonth,
    first_day_of_month: CalendarDate,
    label: String,
}

impl Month {
    fn new(year_month: YearMonth, locale: &Locale) -> Self {
        Self {
            year_month,
            first_day_of_month: year_month.first_day(),
            label: (locale.month_label)(year_month),
        }
    }

    /// Returns the month (1-12).
    pub fn month(&self) -> u8 {
        self.year_month.month()
    }

    /// Returns the year.
    pub fn year(&self) -> i32 {
        self.year_month.year()
    }

    /// Returns the (year, month) pair.
    pub fn year_month(&self) -> YearMonth {
        self.year_month
    }

    /// Returns the first day of the month.
    pub fn first_day_of_month(&self) -> CalendarDate {
        self.first_day_of_month
    }

    /// Returns the header label.
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Half-open date window `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    min: CalendarDate,
    max: CalendarDate,
}

impl Bounds {
    /// Creates bounds, rejecting `min > max` and years outside
    /// [`MIN_YEAR`]..=[`MAX_YEAR`].
    pub fn new(min: CalendarDate, max: CalendarDate) -> Result<Self, ConfigurationError> {
        for date in [min, max] {
            if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
                return Err(ConfigurationError::YearOutOfRange {
                    date,
                    min_year: MIN_YEAR,
                    max_year: MAX_YEAR,
                });
            }
        }
        if min > max {
            return Err(ConfigurationError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Inclusive lower bound.
    pub fn min(&self) -> CalendarDate {
        self.min
    }

    /// Exclusive upper bound.
    pub fn max(&self) -> CalendarDate {
        self.max
    }

    /// Last day inside the window.
    pub fn last_day(&self) -> CalendarDate {
        self.max.pred()
    }

    /// Returns true when `min <= date < max`.
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.min <= date && date < self.max
    }
}

/// Arena address of a cell: month, week row, and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellIndex {
    /// Index into [`Grid::months`].
    pub month: usize,
    /// Week row within the month.
    pub week: usize,
    /// Column within the week.
    pub day: usize,
}

/// Months and their weeks for a bounded date window.
#[derive(Debug, Clone)]
pub struct Grid {
    generation: u64,
    bounds: Bounds,
    locale: Locale,
    months: Vec<Month>,
    weeks: Vec<Vec<Week>>,
}

impl Grid {
    /// Identifier unique to this build of the grid.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The window the grid was built for.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The locale the grid was built with.
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Month descriptors in chronological order.
    pub fn months(&self) -> &[Month] {
        &self.months
    }

    /// Weeks of the month at `month_index`.
    pub fn weeks(&self, month_index: usize) -> &[Week] {
        self.weeks
            .get(month_index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns true when no month falls inside the window.
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Cell at `index`, if it exists.
    pub fn cell(&self, index: CellIndex) -> Option<&Cell> {
        self.weeks
            .get(index.month)?
            .get(index.week)?
            .get(index.day)
    }

    /// Every cell with its index, in month, week, column order.
    pub fn cells(&self) -> impl Iterator<Item = (CellIndex, &Cell)> + '_ {
        self.weeks.iter().enumerate().flat_map(|(month, weeks)| {
            weeks.iter().enumerate().flat_map(move |(week, cells)| {
                cells
                    .iter()
                    .enumerate()
                    .map(move |(day, cell)| (CellIndex { month, week, day }, cell))
            })
        })
    }

    /// First selectable cell showing `date`, searched in month order.
    pub fn find_selectable(&self, date: CalendarDate) -> Option<CellIndex> {
        self.cells()
            .find(|(_, cell)| cell.date == date && cell.is_selectable)
            .map(|(index, _)| index)
    }

    /// Selectable cells strictly between `start` and `end`, in grid order.
    pub fn selectable_between(
        &self,
        start: CalendarDate,
        end: CalendarDate,
    ) -> impl Iterator<Item = (CellIndex, CalendarDate)> + '_ {
        self.cells()
            .filter(move |(_, cell)| cell.is_selectable && start < cell.date && cell.date < end)
            .map(|(index, cell)| (index, cell.date))
    }

    /// Index of the month that owns `date`.
    pub fn month_index_of(&self, date: CalendarDate) -> Option<usize> {
        self.months
            .iter()
            .position(|month| month.year_month().contains(date))
    }

    /// Recomputes every cell's annotations for `selection` without touching
    /// the layout.
    pub fn reannotate(&mut self, selection: &SelectionState) {
        let snapshot = SelectionSnapshot::new(selection);
        let today = self.locale.today;
        let bounds = self.bounds;
        for (month, weeks) in self.months.iter().zip(self.weeks.iter_mut()) {
            for cell in weeks.iter_mut().flat_map(|week| week.iter_mut()) {
                *cell = classify(cell.date, month, &snapshot, today, &bounds);
            }
        }
    }
}

/// Builds [`Grid`]s for a locale.
#[derive(Debug, Clone, Copy)]
pub struct GridBuilder {
    locale: Locale,
}

impl GridBuilder {
    /// Creates a builder for `locale`.
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Builds the grid for `[min, max)`.
    ///
    /// `max` is exclusive: when it falls on the 1st of a month, that month
    /// is not produced.
    #[tracing::instrument(level = "debug", skip(self, selection))]
    pub fn build(
        &self,
        min: CalendarDate,
        max: CalendarDate,
        selection: &SelectionState,
    ) -> Result<Grid, ConfigurationError> {
        let bounds = Bounds::new(min, max)?;
        let last_month = bounds.last_day().year_month();

        let mut months = Vec::new();
        let mut weeks = Vec::new();
        let mut cursor = bounds.min().year_month();
        while cursor.linear_index() <= last_month.linear_index() {
            let month = Month::new(cursor, &self.locale);
            weeks.push(self.build_weeks(&month, &bounds, selection));
            debug!(month = %month.label(), "adding month");
            months.push(month);
            cursor = cursor.add_months(1);
        }

        Ok(Grid {
            generation: NEXT_GRID_GENERATION.fetch_add(1, Ordering::Relaxed),
            bounds,
            locale: self.locale,
            months,
            weeks,
        })
    }

    /// Week rows for `month`, starting on the locale's first day of week and
    /// ending with the week that contains the month's last day.
    pub fn build_weeks(
        &self,
        month: &Month,
        bounds: &Bounds,
        selection: &SelectionState,
    ) -> Vec<Week> {
        let snapshot = SelectionSnapshot::new(selection);
        let today = self.locale.today;
        let first = month.first_day_of_month();
        let mut cursor = first.add_days(-self.locale.offset_from_week_start(first));

        let mut weeks = Vec::new();
        while cursor.year_month() <= month.year_month() {
            debug!(start = %cursor, "building week row");
            let start = cursor;
            weeks.push(std::array::from_fn(|offset| {
                classify(
                    start.add_days(offset as i64),
                    month,
                    &snapshot,
                    today,
                    bounds,
                )
            }));
            cursor = cursor.add_days(DAYS_PER_WEEK as i64);
        }
        weeks
    }
}

/// Derives a cell's flags from the date, the month it is listed under, the
/// selection, today and the bounds.
pub fn classify_cell(
    date: CalendarDate,
    month: &Month,
    selection: &SelectionState,
    today: CalendarDate,
    bounds: &Bounds,
) -> Cell {
    classify(
        date,
        month,
        &SelectionSnapshot::new(selection),
        today,
        bounds,
    )
}

/// Selected dates gathered once per classification pass.
struct SelectionSnapshot {
    dates: BTreeSet<CalendarDate>,
}

impl SelectionSnapshot {
    fn new(selection: &SelectionState) -> Self {
        Self {
            dates: selection.dates().collect(),
        }
    }

    fn range_state(&self, date: CalendarDate) -> RangeState {
        if self.dates.len() < 2 {
            return RangeState::None;
        }
        let (Some(&min), Some(&max)) = (self.dates.first(), self.dates.last()) else {
            return RangeState::None;
        };
        if date == min {
            RangeState::First
        } else if date == max {
            RangeState::Last
        } else if min < date && date < max {
            RangeState::Middle
        } else {
            RangeState::None
        }
    }
}

fn classify(
    date: CalendarDate,
    month: &Month,
    snapshot: &SelectionSnapshot,
    today: CalendarDate,
    bounds: &Bounds,
) -> Cell {
    let is_current_month = month.year_month().contains(date);
    Cell {
        date,
        is_current_month,
        is_selectable: is_current_month && bounds.contains(date),
        is_selected: is_current_month && snapshot.dates.contains(&date),
        is_today: date == today,
        day_value: date.day(),
        range_state: snapshot.range_state(date),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::{date::Weekday, selection::SelectionMode};

    fn date(y: i32, m: u8, d: u8) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    fn build(min: CalendarDate, max: CalendarDate, first_day: Weekday) -> Grid {
        GridBuilder::new(Locale::new(first_day, date(2024, 1, 15)))
            .build(min, max, &SelectionState::new(SelectionMode::Single))
            .unwrap()
    }

    #[test]
    fn test_exclusive_max_drops_month() {
        let grid = build(date(2024, 1, 1), date(2024, 3, 1), Weekday::Sunday);
        let labels: Vec<_> = grid.months().iter().map(Month::label).collect();
        assert_eq!(labels, ["January 2024", "February 2024"]);
    }

    #[test]
    fn test_min_after_max_fails() {
        let err = GridBuilder::new(Locale::new(Weekday::Sunday, date(2024, 1, 1)))
            .build(
                date(2024, 2, 1),
                date(2024, 1, 1),
                &SelectionState::new(SelectionMode::Single),
            )
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidRange { .. }));
    }

    #[rstest(
        min,
        max,
        expected_months,
        case(date(2023, 11, 20), date(2025, 2, 10), 16),
        case(date(2022, 12, 31), date(2025, 5, 1), 29),
        case(date(2024, 6, 15), date(2024, 6, 16), 1),
        case(date(2024, 6, 1), date(2024, 6, 1), 0),
        case(date(2024, 6, 15), date(2024, 6, 15), 1)
    )]
    fn test_month_count_over_spans(
        min: CalendarDate,
        max: CalendarDate,
        expected_months: usize,
    ) {
        let grid = build(min, max, Weekday::Monday);
        assert_eq!(grid.months().len(), expected_months);
        for pair in grid.months().windows(2) {
            assert_eq!(pair[0].year_month().add_months(1), pair[1].year_month());
        }
    }

    #[rstest(first_day, case(Weekday::Sunday), case(Weekday::Monday), case(Weekday::Saturday))]
    fn test_weeks_start_on_locale_first_day(first_day: Weekday) {
        let grid = build(date(2024, 1, 1), date(2024, 7, 1), first_day);
        for month_index in 0..grid.months().len() {
            for week in grid.weeks(month_index) {
                assert_eq!(week[0].date.weekday(), first_day);
                for pair in week.windows(2) {
                    assert_eq!(pair[0].date.succ(), pair[1].date);
                }
            }
        }
    }

    #[test]
    fn test_february_2026_fits_four_rows() {
        // 2026-02-01 is a Sunday and February has 28 days.
        let grid = build(date(2026, 2, 1), date(2026, 3, 1), Weekday::Sunday);
        assert_eq!(grid.weeks(0).len(), 4);
        let grid = build(date(2026, 2, 1), date(2026, 3, 1), Weekday::Monday);
        assert_eq!(grid.weeks(0).len(), 5);
    }

    #[test]
    fn test_leading_and_trailing_cells() {
        let grid = build(date(2024, 1, 10), date(2024, 2, 1), Weekday::Sunday);
        let weeks = grid.weeks(0);
        let first = weeks[0][0];
        assert_eq!(first.date, date(2023, 12, 31));
        assert!(!first.is_current_month);
        assert!(!first.is_selectable);

        // Inside the month but before min.
        let jan_9 = weeks[1][2];
        assert_eq!(jan_9.date, date(2024, 1, 9));
        assert!(jan_9.is_current_month);
        assert!(!jan_9.is_selectable);

        let last_week = weeks.last().unwrap();
        assert_eq!(last_week[6].date, date(2024, 2, 3));
        assert!(!last_week[6].is_current_month);
    }

    #[test]
    fn test_today_flag_ignores_month_ownership() {
        let grid = build(date(2024, 1, 1), date(2024, 3, 1), Weekday::Sunday);
        let todays: Vec<_> = grid
            .cells()
            .filter(|(_, cell)| cell.is_today)
            .map(|(_, cell)| cell.date)
            .collect();
        assert_eq!(todays, [date(2024, 1, 15)]);
    }

    #[test]
    fn test_find_selectable_and_month_index() {
        let grid = build(date(2024, 1, 1), date(2024, 3, 1), Weekday::Sunday);
        // 2024-02-01 also appears as a trailing cell of January.
        let index = grid.find_selectable(date(2024, 2, 1)).unwrap();
        assert_eq!(index.month, 1);
        assert_eq!(grid.cell(index).unwrap().date, date(2024, 2, 1));
        assert_eq!(grid.month_index_of(date(2024, 2, 1)), Some(1));
        assert!(grid.find_selectable(date(2024, 3, 1)).is_none());
        assert!(grid.cell(CellIndex { month: 9, week: 0, day: 0 }).is_none());
    }

    #[test]
    fn test_classify_cell_is_pure() {
        let locale = Locale::new(Weekday::Sunday, date(2024, 1, 15));
        let month = Month::new(YearMonth::new(2024, 1).unwrap(), &locale);
        let bounds = Bounds::new(date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        let selection = SelectionState::new(SelectionMode::Multi);
        let a = classify_cell(date(2024, 1, 15), &month, &selection, locale.today, &bounds);
        let b = classify_cell(date(2024, 1, 15), &month, &selection, locale.today, &bounds);
        assert_eq!(a, b);
        assert!(a.is_today && a.is_selectable && !a.is_selected);
        assert_eq!(a.day_value, 15);
        assert_eq!(a.range_state, RangeState::None);
    }

    #[test]
    fn test_empty_window_mid_month_keeps_month_without_selectable_days() {
        let grid = build(date(2024, 6, 15), date(2024, 6, 15), Weekday::Sunday);
        assert_eq!(grid.months().len(), 1);
        assert!(grid.cells().all(|(_, cell)| !cell.is_selectable));
    }

    #[test]
    fn test_far_future_years_build() {
        let grid = build(
            date(200_000_000, 1, 1),
            date(200_000_000, 2, 1),
            Weekday::Sunday,
        );
        let months: Vec<_> = grid.months().iter().map(|m| (m.year(), m.month())).collect();
        assert_eq!(months, [(200_000_000, 1)]);
        assert_eq!(grid.cells().filter(|(_, c)| c.is_selectable).count(), 31);
    }

    #[rstest(
        min,
        max,
        case(date(i32::MAX, 1, 1), date(i32::MAX, 2, 1)),
        case(date(i32::MIN, 12, 1), date(i32::MIN + 1, 1, 1)),
        case(date(MAX_YEAR, 12, 1), date(i32::MAX, 1, 1))
    )]
    fn test_years_at_the_type_limits_are_rejected(min: CalendarDate, max: CalendarDate) {
        let err = GridBuilder::new(Locale::new(Weekday::Sunday, date(2024, 1, 1)))
            .build(min, max, &SelectionState::new(SelectionMode::Single))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::YearOutOfRange { .. }));
    }

    #[test]
    fn test_last_supported_year_builds() {
        let grid = build(date(MAX_YEAR, 12, 1), date(MAX_YEAR, 12, 31), Weekday::Monday);
        assert_eq!(grid.months().len(), 1);
        let last_week = grid.weeks(0).last().unwrap();
        assert!(last_week.iter().any(|c| c.date == date(MAX_YEAR, 12, 31)));
    }

    #[test]
    fn test_generations_are_unique() {
        let a = build(date(2024, 1, 1), date(2024, 2, 1), Weekday::Sunday);
        let b = build(date(2024, 1, 1), date(2024, 2, 1), Weekday::Sunday);
        assert_ne!(a.generation(), b.generation());
    }
}
