//! Trip history import from spreadsheet exports.

mod parser;

use std::io::Read;
use std::path::Path;

use crate::compliance::TripSubmission;

pub use parser::parse_trip_date;

#[derive(Debug, thiserror::Error)]
pub enum TripImportError {
    #[error("failed to read trip export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid trip CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: missing {column}")]
    MissingDate { line: usize, column: &'static str },
    #[error("line {line}: could not parse {column} '{value}'")]
    InvalidDate {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Reads `Country,Entry Date,Exit Date,Notes` exports (an optional `Trip ID`
/// column is honored).
pub struct TripImporter;

impl TripImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<TripSubmission>, TripImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<TripSubmission>, TripImportError> {
        let trips = parser::parse_trips(reader)?;
        tracing::debug!(rows = trips.len(), "imported trip history");
        Ok(trips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn imports_rows_and_skips_blank_lines() {
        let csv = "Country,Entry Date,Exit Date,Notes\n\
                   France,2025-01-10,2025-01-20,Ski trip\n\
                   ,,,\n\
                   Italy,01/03/2025,15/03/2025,\n";

        let trips = TripImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].country.as_deref(), Some("France"));
        assert_eq!(trips[0].entry, date(2025, 1, 10));
        assert_eq!(trips[0].notes.as_deref(), Some("Ski trip"));
        assert_eq!(trips[1].exit, date(2025, 3, 15));
        assert_eq!(trips[1].notes, None);
        assert_eq!(trips[1].id, None);
    }

    #[test]
    fn honors_trip_id_column() {
        let csv = "Trip ID,Country,Entry Date,Exit Date\nlisbon,PT,2025-05-01,2025-05-04\n";
        let trips = TripImporter::from_reader(Cursor::new(csv)).expect("import succeeds");
        assert_eq!(trips[0].id.as_deref(), Some("lisbon"));
    }

    #[test]
    fn reports_line_of_bad_date() {
        let csv = "Country,Entry Date,Exit Date\nSpain,2025-06-01,2025-06-05\nSpain,June 9,2025-06-12\n";
        match TripImporter::from_reader(Cursor::new(csv)) {
            Err(TripImportError::InvalidDate {
                line,
                column,
                value,
            }) => {
                assert_eq!(line, 3);
                assert_eq!(column, "Entry Date");
                assert_eq!(value, "June 9");
            }
            other => panic!("expected invalid date, got {other:?}"),
        }
    }

    #[test]
    fn line_numbers_follow_the_file_across_empty_lines() {
        let csv = "Country,Entry Date,Exit Date\nSpain,2025-06-01,2025-06-05\n\nSpain,June 9,2025-06-12\n";
        match TripImporter::from_reader(Cursor::new(csv)) {
            Err(TripImportError::InvalidDate { line, value, .. }) => {
                assert_eq!(line, 4);
                assert_eq!(value, "June 9");
            }
            other => panic!("expected invalid date, got {other:?}"),
        }
    }

    #[test]
    fn line_numbers_account_for_multiline_notes() {
        let csv = "Country,Entry Date,Exit Date,Notes\nItaly,2025-05-01,2025-05-04,\"Rome\nthen Florence\"\nItaly,,2025-05-20,\n";
        match TripImporter::from_reader(Cursor::new(csv)) {
            Err(TripImportError::MissingDate { line, column }) => {
                assert_eq!(line, 4);
                assert_eq!(column, "Entry Date");
            }
            other => panic!("expected missing date, got {other:?}"),
        }
    }

    #[test]
    fn reports_missing_exit_date() {
        let csv = "Country,Entry Date,Exit Date\nGreece,2025-07-01,\n";
        match TripImporter::from_reader(Cursor::new(csv)) {
            Err(TripImportError::MissingDate { line, column }) => {
                assert_eq!(line, 2);
                assert_eq!(column, "Exit Date");
            }
            other => panic!("expected missing date, got {other:?}"),
        }
    }
}
