use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::TripImportError;
use crate::compliance::TripSubmission;

pub(crate) fn parse_trips<R: Read>(reader: R) -> Result<Vec<TripSubmission>, TripImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut trips = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        // Empty lines are skipped by the reader and quoted fields may span lines.
        let line = record
            .position()
            .map_or(0, |position| usize::try_from(position.line()).unwrap_or(usize::MAX));
        let row: TripRow = record.deserialize(Some(&headers))?;
        if row.is_blank() {
            continue;
        }

        let entry = required_date(row.entry.as_deref(), line, "Entry Date")?;
        let exit = required_date(row.exit.as_deref(), line, "Exit Date")?;

        trips.push(TripSubmission {
            id: row.id,
            country: row.country,
            entry,
            exit,
            notes: row.notes,
        });
    }

    Ok(trips)
}

#[derive(Debug, Deserialize)]
struct TripRow {
    #[serde(rename = "Trip ID", default, deserialize_with = "empty_string_as_none")]
    id: Option<String>,
    #[serde(rename = "Country", default, deserialize_with = "empty_string_as_none")]
    country: Option<String>,
    #[serde(
        rename = "Entry Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    entry: Option<String>,
    #[serde(
        rename = "Exit Date",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    exit: Option<String>,
    #[serde(rename = "Notes", default, deserialize_with = "empty_string_as_none")]
    notes: Option<String>,
}

impl TripRow {
    fn is_blank(&self) -> bool {
        self.id.is_none()
            && self.country.is_none()
            && self.entry.is_none()
            && self.exit.is_none()
            && self.notes.is_none()
    }
}

fn required_date(
    value: Option<&str>,
    line: usize,
    column: &'static str,
) -> Result<NaiveDate, TripImportError> {
    let raw = value.ok_or(TripImportError::MissingDate { line, column })?;
    parse_trip_date(raw).ok_or_else(|| TripImportError::InvalidDate {
        line,
        column,
        value: raw.to_string(),
    })
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts ISO dates, RFC 3339 timestamps, and European `DD/MM/YYYY`.
pub fn parse_trip_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }

    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 2, 28).expect("valid date");
        assert_eq!(parse_trip_date("2025-02-28"), Some(expected));
        assert_eq!(parse_trip_date(" 28/02/2025 "), Some(expected));
        assert_eq!(parse_trip_date("2025-02-28T23:30:00+01:00"), Some(expected));
        assert_eq!(parse_trip_date("02/28/2025"), None);
        assert_eq!(parse_trip_date(""), None);
    }
}
