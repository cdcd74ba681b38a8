use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use schengen_calc::compliance::{ComplianceEngine, RulePolicy, TripSubmission};
use schengen_calc::config::AppConfig;
use schengen_calc::error::AppError;
use schengen_calc::import::{parse_trip_date, TripImporter};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn engine_from_config(config: &AppConfig) -> ComplianceEngine {
    ComplianceEngine::new(RulePolicy::from(&config.rules))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Parses `ENTRY:EXIT[:COUNTRY]`, e.g. `2025-03-01:2025-03-14:FR`.
pub(crate) fn parse_trip_spec(raw: &str) -> Result<TripSubmission, String> {
    let mut parts = raw.splitn(3, ':');
    let (Some(entry), Some(exit)) = (parts.next(), parts.next()) else {
        return Err(format!("trip '{raw}' must look like ENTRY:EXIT[:COUNTRY]"));
    };

    let entry = parse_trip_date(entry)
        .ok_or_else(|| format!("trip '{raw}' has an unreadable entry date"))?;
    let exit =
        parse_trip_date(exit).ok_or_else(|| format!("trip '{raw}' has an unreadable exit date"))?;

    let mut trip = TripSubmission::new(entry, exit);
    if let Some(country) = parts.next().filter(|value| !value.trim().is_empty()) {
        trip = trip.with_country(country.trim());
    }
    Ok(trip)
}

/// Combine trips from an optional CSV export with trips given inline.
pub(crate) fn load_trips(
    trips_csv: Option<PathBuf>,
    inline: Vec<TripSubmission>,
) -> Result<Vec<TripSubmission>, AppError> {
    let mut trips = match trips_csv {
        Some(path) => TripImporter::from_path(path)?,
        None => Vec::new(),
    };
    trips.extend(inline);
    Ok(trips)
}
