//! The selection controller: owns the grid and the selection, validates taps
//! and keeps cell annotations in sync.
//!
//! ## Usage
//!
//! Build a picker with [`CalendarPicker::init`], optionally attach a
//! [`SelectableDates`] policy and a [`CalendarListener`], then forward taps to
//! [`CalendarPicker::request_select`].
//!
//! ```
//! use timesquare::{CalendarDate, CalendarPicker, Locale, Weekday};
//!
//! let today = CalendarDate::new(2024, 1, 15).unwrap();
//! let mut picker = CalendarPicker::init(
//!     CalendarDate::new(2024, 1, 1).unwrap(),
//!     CalendarDate::new(2024, 3, 1).unwrap(),
//!     Locale::new(Weekday::Sunday, today),
//! )
//! .unwrap();
//!
//! assert_eq!(picker.grid().months().len(), 2);
//! assert!(picker.request_select(today).accepted);
//! assert_eq!(picker.selected_date(), Some(today));
//! ```
use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    config::SelectionConfig,
    date::CalendarDate,
    error::ConfigurationError,
    grid::{Bounds, Grid, GridBuilder},
    locale::Locale,
    selection::{SelectedEntry, SelectionMode, SelectionState},
};

/// Controls which in-bounds dates can be selected.
pub trait SelectableDates: Send + Sync {
    /// Returns true when the date can be selected.
    fn is_selectable_date(&self, _date: CalendarDate) -> bool {
        true
    }
}

struct AllDates;

impl SelectableDates for AllDates {}

impl<F> SelectableDates for F
where
    F: Fn(CalendarDate) -> bool + Send + Sync,
{
    fn is_selectable_date(&self, date: CalendarDate) -> bool {
        self(date)
    }
}

/// Notifications emitted towards the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarEvent {
    /// A tap landed outside the bounds or on a date the policy rejects.
    InvalidDateSelected(CalendarDate),
    /// A tap left its date selected.
    DateAccepted(CalendarDate),
}

/// Host-side receiver of events and redraw requests.
///
/// Both methods default to doing nothing, so headless hosts can ignore
/// either.
pub trait CalendarListener: Send + Sync {
    /// Called for every [`CalendarEvent`].
    fn on_event(&self, _event: &CalendarEvent) {}

    /// Called after the grid or the selection changed.
    fn notify_changed(&self) {}
}

struct NoopListener;

impl CalendarListener for NoopListener {}

/// Month the host should bring into view.
///
/// The core never performs or waits for the scroll; dropping the hint is
/// fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollHint {
    /// Index into [`Grid::months`].
    pub month_index: usize,
}

/// Result of a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOutcome {
    /// Whether the tapped date is selected afterwards.
    pub accepted: bool,
}

/// A selection computed by [`CalendarPicker::configure`], ready for
/// [`CalendarPicker::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSelection {
    grid_generation: u64,
    state: SelectionState,
}

impl PreparedSelection {
    /// The selection that will be installed.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }
}

/// Calendar picker core.
pub struct CalendarPicker {
    grid: Grid,
    selection: SelectionState,
    selectable_dates: Arc<dyn SelectableDates>,
    listener: Arc<dyn CalendarListener>,
}

impl CalendarPicker {
    /// Builds the grid for `[min, max)` in Single mode with nothing selected.
    #[tracing::instrument(level = "debug", skip(locale))]
    pub fn init(
        min: CalendarDate,
        max: CalendarDate,
        locale: Locale,
    ) -> Result<Self, ConfigurationError> {
        let selection = SelectionState::new(SelectionMode::Single);
        let grid = GridBuilder::new(locale).build(min, max, &selection)?;
        Ok(Self {
            grid,
            selection,
            selectable_dates: Arc::new(AllDates),
            listener: Arc::new(NoopListener),
        })
    }

    /// Rebuilds the grid for new bounds, keeping the locale, the policy and
    /// the listener. The selection resets to Single mode.
    ///
    /// On error the current grid and selection stay in place.
    pub fn reinit(
        &mut self,
        min: CalendarDate,
        max: CalendarDate,
    ) -> Result<(), ConfigurationError> {
        let selection = SelectionState::new(SelectionMode::Single);
        self.grid = GridBuilder::new(*self.grid.locale()).build(min, max, &selection)?;
        self.selection = selection;
        self.listener.notify_changed();
        Ok(())
    }

    /// Sets the selectability policy.
    pub fn with_selectable_dates(mut self, selectable_dates: Arc<dyn SelectableDates>) -> Self {
        self.selectable_dates = selectable_dates;
        self
    }

    /// Sets the host listener.
    pub fn with_listener(mut self, listener: Arc<dyn CalendarListener>) -> Self {
        self.listener = listener;
        self
    }

    /// Replaces the selectability policy. Existing selections are kept.
    pub fn set_selectable_dates(&mut self, selectable_dates: Arc<dyn SelectableDates>) {
        self.selectable_dates = selectable_dates;
    }

    /// Replaces the host listener.
    pub fn set_listener(&mut self, listener: Arc<dyn CalendarListener>) {
        self.listener = listener;
    }

    /// The annotated grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The selection.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// The bounds the grid was built for.
    pub fn bounds(&self) -> Bounds {
        self.grid.bounds()
    }

    /// Current selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    /// Switches mode, dropping the current selection.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.selection = SelectionState::new(mode);
        self.refresh();
    }

    /// Selected dates, ascending.
    pub fn selected_dates(&self) -> Vec<CalendarDate> {
        self.selection.sorted_dates()
    }

    /// The first date that was selected, not necessarily the earliest.
    pub fn selected_date(&self) -> Option<CalendarDate> {
        self.selection.first_inserted()
    }

    /// Handles a tap on `date`.
    ///
    /// Rejected taps emit [`CalendarEvent::InvalidDateSelected`] and leave the
    /// selection untouched.
    pub fn request_select(&mut self, date: CalendarDate) -> SelectOutcome {
        let bounds = self.grid.bounds();
        let target = if !bounds.contains(date) {
            warn!(%date, min = %bounds.min(), max = %bounds.max(), "tap outside bounds");
            None
        } else if !self.selectable_dates.is_selectable_date(date) {
            warn!(%date, "tap on unselectable date");
            None
        } else {
            self.grid.find_selectable(date)
        };

        let Some(cell) = target else {
            self.listener
                .on_event(&CalendarEvent::InvalidDateSelected(date));
            return SelectOutcome { accepted: false };
        };

        let accepted = self.apply_selection(SelectedEntry { date, cell });
        if accepted {
            self.listener.on_event(&CalendarEvent::DateAccepted(date));
        }
        SelectOutcome { accepted }
    }

    /// Selects `date` programmatically.
    ///
    /// Returns the month to scroll to when the date ended up selected, and
    /// `None` without side effects when no selectable cell shows it or the
    /// policy rejects it.
    pub fn select_date(&mut self, date: CalendarDate) -> Option<ScrollHint> {
        let cell = self.grid.find_selectable(date)?;
        if !self.selectable_dates.is_selectable_date(date) {
            return None;
        }
        self.apply_selection(SelectedEntry { date, cell })
            .then_some(ScrollHint {
                month_index: cell.month,
            })
    }

    /// Computes the selection `config` would produce, without changing the
    /// picker.
    ///
    /// Dates the policy rejects are skipped.
    pub fn configure(
        &self,
        config: &SelectionConfig,
    ) -> Result<PreparedSelection, ConfigurationError> {
        if config.mode == SelectionMode::Single && config.selected_dates.len() > 1 {
            return Err(ConfigurationError::SingleModeMultipleDates {
                count: config.selected_dates.len(),
            });
        }

        let bounds = self.grid.bounds();
        let mut state = SelectionState::new(config.mode);
        for &date in &config.selected_dates {
            if !bounds.contains(date) {
                return Err(ConfigurationError::DateOutOfBounds {
                    date,
                    min: bounds.min(),
                    max: bounds.max(),
                });
            }
            if !self.selectable_dates.is_selectable_date(date) {
                debug!(%date, "skipping unselectable initial date");
                continue;
            }
            if let Some(cell) = self.grid.find_selectable(date) {
                state.select(SelectedEntry { date, cell }, &self.grid);
            }
        }

        Ok(PreparedSelection {
            grid_generation: self.grid.generation(),
            state,
        })
    }

    /// Installs a prepared selection and returns the month to show: the
    /// first month holding a selected date, else the month holding today.
    ///
    /// Fails with [`ConfigurationError::StaleSelection`] when the grid was
    /// rebuilt after the selection was prepared.
    #[tracing::instrument(level = "debug", skip(self, prepared))]
    pub fn apply(
        &mut self,
        prepared: PreparedSelection,
    ) -> Result<Option<ScrollHint>, ConfigurationError> {
        if prepared.grid_generation != self.grid.generation() {
            return Err(ConfigurationError::StaleSelection);
        }
        self.selection = prepared.state;
        self.refresh();
        Ok(self.initial_scroll())
    }

    /// Validates `config` and applies it in one step.
    pub fn configure_and_apply(
        &mut self,
        config: &SelectionConfig,
    ) -> Result<Option<ScrollHint>, ConfigurationError> {
        let prepared = self.configure(config)?;
        self.apply(prepared)
    }

    fn apply_selection(&mut self, entry: SelectedEntry) -> bool {
        let selected = self.selection.select(entry, &self.grid);
        debug!(
            date = %entry.date,
            mode = %self.selection.mode(),
            selected,
            total = self.selection.len(),
            "selection applied"
        );
        self.refresh();
        selected
    }

    fn refresh(&mut self) {
        self.grid.reannotate(&self.selection);
        self.listener.notify_changed();
    }

    fn initial_scroll(&self) -> Option<ScrollHint> {
        let months = self.grid.months();
        let selected = months.iter().position(|month| {
            self.selection
                .dates()
                .any(|date| month.year_month().contains(date))
        });
        let today = self.grid.locale().today;
        selected
            .or_else(|| self.grid.month_index_of(today))
            .map(|month_index| ScrollHint { month_index })
    }
}
