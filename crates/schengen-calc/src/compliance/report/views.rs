use super::super::calculator::ComplianceStatus;
use super::super::conflicts::ConflictKind;
use super::super::countries::SchengenCountry;
use super::super::domain::TripId;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TripUsageEntry {
    pub trip_id: TripId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub entry: NaiveDate,
    pub exit: NaiveDate,
    pub days_in_window: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExcludedTripEntry {
    pub trip_id: TripId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub entry: NaiveDate,
    pub exit: NaiveDate,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverstayPeriodView {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub presence_days: u32,
    pub max_overstay_days: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConflictView {
    pub first: TripId,
    pub second: TripId,
    pub kind: ConflictKind,
    pub kind_label: &'static str,
    pub blocking: bool,
    pub overlap_start: NaiveDate,
    pub overlap_end: NaiveDate,
    pub overlap_days: u32,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComplianceReportSummary {
    pub reference_date: NaiveDate,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub days_used: u32,
    pub days_remaining: u32,
    pub overstay_days: u32,
    pub compliant: bool,
    pub status: ComplianceStatus,
    pub status_label: &'static str,
    pub trip_usage: Vec<TripUsageEntry>,
    pub excluded_trips: Vec<ExcludedTripEntry>,
    pub history_compliant: bool,
    pub peak_days_used: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_date: Option<NaiveDate>,
    pub overstay_periods: Vec<OverstayPeriodView>,
    pub conflicts: Vec<ConflictView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CountryView {
    pub code: &'static str,
    pub name: &'static str,
}

impl From<SchengenCountry> for CountryView {
    fn from(country: SchengenCountry) -> Self {
        Self {
            code: country.iso_code(),
            name: country.label(),
        }
    }
}
