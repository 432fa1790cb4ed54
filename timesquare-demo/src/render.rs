use std::fmt::Write;

use owo_colors::OwoColorize;
use timesquare::{Cell, Grid, RangeState};

const CELL_WIDTH: usize = 4;

#[derive(Clone, Copy)]
pub struct Style {
    pub color: bool,
}

/// Renders every month as a header, a weekday row and its week rows.
///
/// Cells outside the month are blank, selected days are bracketed and range
/// ends are marked with `<` and `>`.
pub fn grid(grid: &Grid, style: Style) -> String {
    let headers: String = grid
        .locale()
        .weekday_sequence()
        .iter()
        .map(|day| format!("{:>width$}", day.short_label(), width = CELL_WIDTH))
        .collect();

    let mut out = String::new();
    for (index, month) in grid.months().iter().enumerate() {
        let title = month.label();
        if style.color {
            let _ = writeln!(out, "{}", title.bold());
        } else {
            let _ = writeln!(out, "{title}");
        }
        let _ = writeln!(out, "{headers}");
        for week in grid.weeks(index) {
            for cell in week {
                out.push_str(&cell_text(cell, style));
            }
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

fn cell_text(cell: &Cell, style: Style) -> String {
    if !cell.is_current_month {
        return " ".repeat(CELL_WIDTH);
    }
    let text = match (cell.is_selected, cell.range_state) {
        (true, RangeState::First) => format!("<{:>2}]", cell.day_value),
        (true, RangeState::Last) => format!("[{:>2}>", cell.day_value),
        (true, _) => format!("[{:>2}]", cell.day_value),
        (false, _) => format!("{:>width$}", cell.day_value, width = CELL_WIDTH),
    };
    if !style.color {
        return text;
    }
    if cell.is_selected {
        text.black().on_cyan().to_string()
    } else if cell.is_today {
        text.yellow().bold().to_string()
    } else if !cell.is_selectable {
        text.dimmed().to_string()
    } else {
        text
    }
}
