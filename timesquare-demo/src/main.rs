use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use timesquare::{
    CalendarDate, CalendarEvent, CalendarListener, CalendarPicker, Locale, ScrollHint,
    SelectionConfig, SelectionMode, Weekday,
};
use tracing::info;

mod render;

#[derive(Parser)]
#[command(name = "timesquare-demo")]
#[command(version, about = "Print a calendar picker grid in the terminal", long_about = None)]
struct Cli {
    /// First selectable day (YYYY-MM-DD)
    #[arg(long)]
    min: CalendarDate,
    /// Exclusive upper bound (YYYY-MM-DD)
    #[arg(long)]
    max: CalendarDate,
    /// Selection mode: single, multi or range
    #[arg(short, long, default_value = "single")]
    mode: SelectionMode,
    /// First day of each week row
    #[arg(long, default_value = "sunday")]
    week_start: Weekday,
    /// Override today's date (defaults to the current UTC date)
    #[arg(long)]
    today: Option<CalendarDate>,
    /// Dates applied as the initial selection
    #[arg(long = "initial")]
    initial: Vec<CalendarDate>,
    /// Dates tapped after the initial selection, in order
    #[arg(short = 't', long = "tap")]
    taps: Vec<CalendarDate>,
    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

struct LogListener;

impl CalendarListener for LogListener {
    fn on_event(&self, event: &CalendarEvent) {
        match event {
            CalendarEvent::InvalidDateSelected(date) => info!(%date, "tap rejected"),
            CalendarEvent::DateAccepted(date) => info!(%date, "tap accepted"),
        }
    }
}

fn init_tracing() {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match tracing_subscriber::EnvFilter::try_new("error,timesquare=info") {
            Ok(filter) => filter,
            Err(_) => tracing_subscriber::EnvFilter::new("error"),
        },
    };

    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let locale = Locale::new(cli.week_start, cli.today.unwrap_or_else(CalendarDate::today));
    let mut picker = CalendarPicker::init(cli.min, cli.max, locale)
        .context("failed to build the calendar grid")?
        .with_listener(Arc::new(LogListener));

    let config = SelectionConfig::default()
        .mode(cli.mode)
        .selected_dates(cli.initial);
    let mut scroll = picker
        .configure_and_apply(&config)
        .context("failed to apply the initial selection")?;

    for date in cli.taps {
        if picker.request_select(date).accepted {
            scroll = picker
                .grid()
                .month_index_of(date)
                .map(|month_index| ScrollHint { month_index });
        }
    }

    let style = render::Style { color: !cli.no_color };
    print!("{}", render::grid(picker.grid(), style));

    let selected: Vec<_> = picker
        .selected_dates()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("mode: {}", picker.mode());
    println!("selected: [{}]", selected.join(", "));
    let target = scroll.and_then(|hint| picker.grid().months().get(hint.month_index));
    if let Some(month) = target {
        println!("scroll to: {}", month.label());
    }
    Ok(())
}
