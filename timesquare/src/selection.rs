//! Selection modes and the per-mode selection state machine.
use std::{fmt, str::FromStr};

use tracing::debug;

use crate::{
    date::CalendarDate,
    error::ConfigurationError,
    grid::{CellIndex, Grid},
};

/// How taps combine into a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionMode {
    /// One date at a time.
    #[default]
    Single,
    /// Any set of dates, toggled individually.
    Multi,
    /// A contiguous span between two anchors.
    Range,
}

impl FromStr for SelectionMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(SelectionMode::Single),
            "multi" | "multiple" => Ok(SelectionMode::Multi),
            "range" => Ok(SelectionMode::Range),
            _ => Err(ConfigurationError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SelectionMode::Single => "single",
            SelectionMode::Multi => "multi",
            SelectionMode::Range => "range",
        })
    }
}

/// A selected date and the grid cell that shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedEntry {
    /// The selected day.
    pub date: CalendarDate,
    /// Where the day sits in the grid.
    pub cell: CellIndex,
}

/// Range-mode progress.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RangeSelection {
    /// Nothing picked yet.
    #[default]
    Empty,
    /// One anchor picked.
    Anchored(SelectedEntry),
    /// Both anchors picked and the days between them filled in.
    Spanning {
        /// Earlier anchor.
        first: SelectedEntry,
        /// Later anchor.
        last: SelectedEntry,
        /// Selectable days strictly between the anchors.
        interior: Vec<SelectedEntry>,
    },
}

/// The current selection, shaped by its mode.
///
/// Entries are kept in insertion order. Each entry carries both the date and
/// its cell, so the selected dates and the selected cells always have the
/// same length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    /// At most one entry.
    Single(Option<SelectedEntry>),
    /// Toggled entries.
    Multi(Vec<SelectedEntry>),
    /// Anchors and their expansion.
    Range(RangeSelection),
}

impl SelectionState {
    /// Empty selection for `mode`.
    pub fn new(mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::Single => SelectionState::Single(None),
            SelectionMode::Multi => SelectionState::Multi(Vec::new()),
            SelectionMode::Range => SelectionState::Range(RangeSelection::Empty),
        }
    }

    /// The mode this selection follows.
    pub fn mode(&self) -> SelectionMode {
        match self {
            SelectionState::Single(_) => SelectionMode::Single,
            SelectionState::Multi(_) => SelectionMode::Multi,
            SelectionState::Range(_) => SelectionMode::Range,
        }
    }

    /// Entries in insertion order. For an expanded range that is the two
    /// anchors followed by the interior days.
    pub fn entries(&self) -> impl Iterator<Item = &SelectedEntry> + '_ {
        let (head, tail): ([Option<&SelectedEntry>; 2], &[SelectedEntry]) = match self {
            SelectionState::Single(slot) => ([slot.as_ref(), None], &[][..]),
            SelectionState::Multi(entries) => ([None, None], entries.as_slice()),
            SelectionState::Range(RangeSelection::Empty) => ([None, None], &[][..]),
            SelectionState::Range(RangeSelection::Anchored(anchor)) => {
                ([Some(anchor), None], &[][..])
            }
            SelectionState::Range(RangeSelection::Spanning {
                first,
                last,
                interior,
            }) => ([Some(first), Some(last)], interior.as_slice()),
        };
        head.into_iter().flatten().chain(tail)
    }

    /// Selected dates in insertion order.
    pub fn dates(&self) -> impl Iterator<Item = CalendarDate> + '_ {
        self.entries().map(|entry| entry.date)
    }

    /// Selected cells in insertion order.
    pub fn cells(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.entries().map(|entry| entry.cell)
    }

    /// Number of selected dates.
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    /// Returns true when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    /// Returns true when `date` is selected.
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.dates().any(|selected| selected == date)
    }

    /// The date inserted first, which is not necessarily the earliest.
    pub fn first_inserted(&self) -> Option<CalendarDate> {
        self.dates().next()
    }

    /// Selected dates in ascending order.
    pub fn sorted_dates(&self) -> Vec<CalendarDate> {
        let mut dates: Vec<_> = self.dates().collect();
        dates.sort();
        dates
    }

    /// Drops every entry, keeping the mode.
    pub fn clear(&mut self) {
        *self = SelectionState::new(self.mode());
    }

    /// Applies a tap on `entry` according to the mode.
    ///
    /// Returns true when `entry.date` is selected afterwards; a Multi-mode
    /// deselect returns false.
    pub fn select(&mut self, entry: SelectedEntry, grid: &Grid) -> bool {
        match self {
            SelectionState::Single(slot) => select_single(slot, entry),
            SelectionState::Multi(entries) => toggle_multi(entries, entry),
            SelectionState::Range(range) => extend_range(range, entry, grid),
        }
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        SelectionState::new(SelectionMode::default())
    }
}

fn select_single(slot: &mut Option<SelectedEntry>, entry: SelectedEntry) -> bool {
    *slot = Some(entry);
    true
}

fn toggle_multi(entries: &mut Vec<SelectedEntry>, entry: SelectedEntry) -> bool {
    if let Some(pos) = entries.iter().position(|e| e.date == entry.date) {
        entries.remove(pos);
        return false;
    }
    entries.push(entry);
    true
}

fn extend_range(range: &mut RangeSelection, entry: SelectedEntry, grid: &Grid) -> bool {
    *range = match std::mem::take(range) {
        RangeSelection::Empty | RangeSelection::Spanning { .. } => RangeSelection::Anchored(entry),
        // Never build a backwards span: an earlier tap restarts the range.
        RangeSelection::Anchored(anchor) if entry.date < anchor.date => {
            RangeSelection::Anchored(entry)
        }
        RangeSelection::Anchored(anchor) if entry.date == anchor.date => {
            RangeSelection::Anchored(anchor)
        }
        RangeSelection::Anchored(anchor) => {
            let interior: Vec<_> = grid
                .selectable_between(anchor.date, entry.date)
                .map(|(cell, date)| SelectedEntry { date, cell })
                .collect();
            debug!(
                first = %anchor.date,
                last = %entry.date,
                interior = interior.len(),
                "expanded range"
            );
            RangeSelection::Spanning {
                first: anchor,
                last: entry,
                interior,
            }
        }
    };
    true
}
