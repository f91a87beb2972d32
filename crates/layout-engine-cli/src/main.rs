//! `calgrid` CLI — lay out calendar events for a day, a week or a month.
//!
//! ## Usage
//!
//! ```sh
//! # Positioned segments for one day (events read from stdin)
//! cat events.json | calgrid day --date 2026-03-04
//!
//! # Day layout in a local timezone, as drawable boxes
//! calgrid day --date 2026-03-04 --tz America/Sao_Paulo --boxes -i events.json
//!
//! # The Sunday-to-Saturday week containing a date, written to a file
//! calgrid week --date 2026-03-04 -i events.json -o week.json
//!
//! # Days of a month on which events start
//! calgrid month --month 2026-03 -i events.json
//! ```
//!
//! Input is either a JSON array of event records or a store snapshot
//! (`{"version": 1, "events": [...]}`).

use std::io::{self, IsTerminal, Read};

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use clap::{ArgAction, Args, Parser, Subcommand};
use layout_engine::time::{day_key, parse_day_key, parse_timezone};
use layout_engine::{layout_day, layout_week, EventRecord, InMemoryEventStore, ViewState};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "calgrid",
    version,
    about = "Lay out calendar events into non-overlapping columns"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Decrease log verbosity (-q warn, -qq error)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    quiet: u8,
}

#[derive(Args)]
struct IoArgs {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
    /// IANA timezone that defines calendar days
    #[arg(long, env = "CALGRID_TZ", default_value = "UTC")]
    tz: String,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a single day
    Day {
        /// Day to lay out (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Emit drawable boxes (start minute, duration, columns) instead of segments
        #[arg(long)]
        boxes: bool,
        #[command(flatten)]
        io: IoArgs,
    },
    /// Lay out the Sunday-to-Saturday week containing a day
    Week {
        /// Any day in the week (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        #[command(flatten)]
        io: IoArgs,
    },
    /// List the days of a month on which events start
    Month {
        /// Month to inspect (YYYY-MM)
        #[arg(long)]
        month: String,
        #[command(flatten)]
        io: IoArgs,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MonthSummary {
    month: String,
    days: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet)?;

    match cli.command {
        Commands::Day { date, boxes, io } => {
            let day = parse_date(&date)?;
            let tz = parse_tz(&io.tz)?;
            let store = load_store(io.input.as_deref(), tz)?;

            let layout = layout_day(&store, day, tz, &ViewState::ready());
            info!(day = %day, segments = layout.segments.len(), "day laid out");

            let json = if boxes {
                to_json(&layout.boxes(), io.pretty)?
            } else {
                to_json(&layout, io.pretty)?
            };
            write_output(io.output.as_deref(), &json)?;
        }
        Commands::Week { date, io } => {
            let day = parse_date(&date)?;
            let tz = parse_tz(&io.tz)?;
            let store = load_store(io.input.as_deref(), tz)?;

            let layout = layout_week(&store, day, tz, &ViewState::ready());
            info!(week_start = %layout.week_start, "week laid out");

            write_output(io.output.as_deref(), &to_json(&layout, io.pretty)?)?;
        }
        Commands::Month { month, io } => {
            let first = parse_month(&month)?;
            let tz = parse_tz(&io.tz)?;
            let store = load_store(io.input.as_deref(), tz)?;

            let days = store
                .days_with_events_in_month(first.year(), first.month())
                .into_iter()
                .map(day_key)
                .collect();
            let summary = MonthSummary {
                month: first.format("%Y-%m").to_string(),
                days,
            };

            write_output(io.output.as_deref(), &to_json(&summary, io.pretty)?)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8, quiet: u8) -> Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_ansi(io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    parse_day_key(raw).ok_or_else(|| anyhow!("Invalid date: '{}'. Expected YYYY-MM-DD", raw))
}

fn parse_month(raw: &str) -> Result<NaiveDate> {
    parse_day_key(&format!("{}-01", raw.trim()))
        .ok_or_else(|| anyhow!("Invalid month: '{}'. Expected YYYY-MM", raw))
}

fn parse_tz(raw: &str) -> Result<Tz> {
    parse_timezone(raw).context("Failed to resolve --tz")
}

/// Build a store from either a bare record array or a versioned snapshot.
fn load_store(input: Option<&str>, tz: Tz) -> Result<InMemoryEventStore> {
    let raw = read_input(input)?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).context("Failed to parse input as JSON")?;

    let store = if value.is_array() {
        let records: Vec<EventRecord> =
            serde_json::from_value(value).context("Failed to read event records")?;
        InMemoryEventStore::from_records(tz, &records)
    } else {
        InMemoryEventStore::from_json(&raw, tz).context("Failed to read store snapshot")?
    };

    debug!(events = store.len(), "loaded events");
    Ok(store)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
