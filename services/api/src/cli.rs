use crate::infra::{engine_from_config, load_trips, parse_date, parse_trip_spec};
use crate::render::{render_countries, render_earliest_entry, render_projection, render_report};
use crate::server;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use schengen_calc::compliance::{ComplianceEngine, TripSubmission, ValidatedTrips};
use schengen_calc::config::AppConfig;
use schengen_calc::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Schengen Calculator",
    about = "Check Schengen 90/180-day compliance from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Report days used, days remaining, overstays and conflicting trips
    Check(CheckArgs),
    /// Project whether a planned trip keeps the history compliant
    Plan(PlanArgs),
    /// Find the first date a stay of the given length is allowed
    EarliestEntry(EarliestEntryArgs),
    /// List the Schengen member states recognised in trip records
    Countries,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct TripSourceArgs {
    /// CSV export with Country, Entry Date, Exit Date and Notes columns
    #[arg(long)]
    pub(crate) trips_csv: Option<PathBuf>,
    /// Inline trip as ENTRY:EXIT[:COUNTRY]; repeat for several trips
    #[arg(long = "trip", value_parser = parse_trip_spec)]
    pub(crate) trips: Vec<TripSubmission>,
}

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    pub(crate) source: TripSourceArgs,
    /// Reference date for the rolling window (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print a day-by-day usage timeline for the window
    #[arg(long)]
    pub(crate) timeline: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PlanArgs {
    #[command(flatten)]
    pub(crate) source: TripSourceArgs,
    /// Planned entry date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) entry: NaiveDate,
    /// Planned exit date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) exit: NaiveDate,
    /// Destination country of the planned trip
    #[arg(long)]
    pub(crate) country: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct EarliestEntryArgs {
    #[command(flatten)]
    pub(crate) source: TripSourceArgs,
    /// Length of the intended stay in days
    #[arg(long)]
    pub(crate) length: u32,
    /// Search from this date (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) from: Option<NaiveDate>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check(args) => run_check(args),
        Command::Plan(args) => run_plan(args),
        Command::EarliestEntry(args) => run_earliest_entry(args),
        Command::Countries => {
            render_countries();
            Ok(())
        }
    }
}

fn prepare(source: TripSourceArgs) -> Result<(ComplianceEngine, ValidatedTrips), AppError> {
    let config = AppConfig::load()?;
    let engine = engine_from_config(&config);
    let submissions = load_trips(source.trips_csv, source.trips)?;
    let trips = engine.validate(submissions)?;
    Ok((engine, trips))
}

pub(crate) fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let CheckArgs {
        source,
        today,
        timeline,
    } = args;

    let (engine, trips) = prepare(source)?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let report = engine.report(&trips, today);

    let timeline = if timeline {
        let window = engine.policy().window_for(today);
        Some(engine.daily_timeline(&trips, window.start, window.end))
    } else {
        None
    };

    render_report(&report, timeline.as_deref());
    Ok(())
}

pub(crate) fn run_plan(args: PlanArgs) -> Result<(), AppError> {
    let PlanArgs {
        source,
        entry,
        exit,
        country,
    } = args;

    let (engine, trips) = prepare(source)?;
    let mut planned = TripSubmission::new(entry, exit);
    if let Some(country) = country {
        planned = planned.with_country(country);
    }

    let projection = engine.project_trip(&trips, planned.clone())?;
    let conflicts = engine.planned_conflicts(&trips, planned)?;
    render_projection(&projection, &conflicts);
    Ok(())
}

pub(crate) fn run_earliest_entry(args: EarliestEntryArgs) -> Result<(), AppError> {
    let EarliestEntryArgs {
        source,
        length,
        from,
    } = args;

    let (engine, trips) = prepare(source)?;
    let from = from.unwrap_or_else(|| Local::now().date_naive());
    let earliest = engine.earliest_entry(&trips, length, from);
    render_earliest_entry(length, from, earliest, engine.policy().max_stay_days());
    Ok(())
}
