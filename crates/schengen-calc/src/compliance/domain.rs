use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::countries::SchengenCountry;
use super::policy::{RulePolicy, MAX_HISTORY_DAYS};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(pub String);

impl TripId {
    pub fn generated(position: usize) -> Self {
        Self(format!("trip-{}", position + 1))
    }

    pub fn planned() -> Self {
        Self("planned-trip".to_string())
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw trip as entered by a traveller or imported from a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripSubmission {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub entry: NaiveDate,
    pub exit: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl TripSubmission {
    pub fn new(entry: NaiveDate, exit: NaiveDate) -> Self {
        Self {
            id: None,
            country: None,
            entry,
            exit,
            notes: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// A validated stay. Entry and exit days both count as days of presence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trip {
    pub id: TripId,
    pub country: Option<String>,
    pub member_state: Option<SchengenCountry>,
    pub entry: NaiveDate,
    pub exit: NaiveDate,
    pub notes: Option<String>,
    pub counts_toward_allowance: bool,
}

impl Trip {
    pub fn duration_days(&self) -> u32 {
        inclusive_days(self.entry, self.exit)
    }

    pub fn overlaps(&self, other: &Trip) -> bool {
        self.entry <= other.exit && other.entry <= self.exit
    }

    fn from_submission(
        submission: TripSubmission,
        position: usize,
        policy: &RulePolicy,
    ) -> Result<Self, TripValidationError> {
        let id = submission
            .id
            .filter(|value| !value.trim().is_empty())
            .map(|value| TripId(value.trim().to_string()))
            .unwrap_or_else(|| TripId::generated(position));

        if submission.exit < submission.entry {
            return Err(TripValidationError::ExitBeforeEntry {
                id,
                entry: submission.entry,
                exit: submission.exit,
            });
        }

        let reach = Duration::days(i64::from(policy.window_days()) * 2);
        if submission.entry.checked_sub_signed(reach).is_none()
            || submission.exit.checked_add_signed(reach).is_none()
        {
            return Err(TripValidationError::OutOfRange { id });
        }

        let days = inclusive_days(submission.entry, submission.exit);
        if days > MAX_HISTORY_DAYS {
            return Err(TripValidationError::TripTooLong {
                id,
                days,
                max: MAX_HISTORY_DAYS,
            });
        }

        let country = submission
            .country
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        let member_state = country.as_deref().and_then(SchengenCountry::lookup);
        let counts_toward_allowance = match (&country, member_state) {
            (None, _) => true,
            (Some(_), Some(_)) => true,
            (Some(raw), None) => {
                if policy.strict_countries() {
                    return Err(TripValidationError::UnknownCountry {
                        id,
                        country: raw.clone(),
                    });
                }
                false
            }
        };

        Ok(Self {
            id,
            country,
            member_state,
            entry: submission.entry,
            exit: submission.exit,
            notes: submission.notes.filter(|value| !value.trim().is_empty()),
            counts_toward_allowance,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripValidationError {
    #[error("trip {id} exits on {exit} before it enters on {entry}")]
    ExitBeforeEntry {
        id: TripId,
        entry: NaiveDate,
        exit: NaiveDate,
    },
    #[error("trip id {0} is used more than once")]
    DuplicateId(TripId),
    #[error("trip {id} lists '{country}', which is not a Schengen member state")]
    UnknownCountry { id: TripId, country: String },
    #[error("trip {id} falls outside the supported calendar range")]
    OutOfRange { id: TripId },
    #[error("trip {id} lasts {days} days, longer than the supported {max}")]
    TripTooLong { id: TripId, days: u32, max: u32 },
    #[error("trip history runs from {first} to {last} ({days} days), longer than the supported {max}")]
    HistoryTooLong {
        first: NaiveDate,
        last: NaiveDate,
        days: u32,
        max: u32,
    },
}

/// Trip history that passed validation, sorted by entry date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedTrips {
    trips: Vec<Trip>,
}

impl ValidatedTrips {
    pub fn as_slice(&self) -> &[Trip] {
        &self.trips
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trip> {
        self.trips.iter()
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn counting(&self) -> impl Iterator<Item = &Trip> {
        self.trips.iter().filter(|trip| trip.counts_toward_allowance)
    }

    pub fn excluded(&self) -> impl Iterator<Item = &Trip> {
        self.trips.iter().filter(|trip| !trip.counts_toward_allowance)
    }

    pub fn get(&self, id: &TripId) -> Option<&Trip> {
        self.trips.iter().find(|trip| &trip.id == id)
    }

    /// Copy of this history with one more trip merged in, keeping sort order.
    pub(crate) fn with_trip(&self, trip: Trip) -> Result<Self, TripValidationError> {
        if self.get(&trip.id).is_some() {
            return Err(TripValidationError::DuplicateId(trip.id));
        }
        let mut trips = self.trips.clone();
        trips.push(trip);
        sort_trips(&mut trips);
        Ok(Self { trips })
    }
}

impl<'a> IntoIterator for &'a ValidatedTrips {
    type Item = &'a Trip;
    type IntoIter = std::slice::Iter<'a, Trip>;

    fn into_iter(self) -> Self::IntoIter {
        self.trips.iter()
    }
}

/// Validate and sort a trip history. Overlapping trips are kept; they are
/// surfaced by conflict detection rather than rejected here.
pub fn validate_trips(
    submissions: Vec<TripSubmission>,
    policy: &RulePolicy,
) -> Result<ValidatedTrips, TripValidationError> {
    let mut seen = HashSet::new();
    let mut trips = Vec::with_capacity(submissions.len());

    for (position, submission) in submissions.into_iter().enumerate() {
        let trip = Trip::from_submission(submission, position, policy)?;
        if !seen.insert(trip.id.clone()) {
            return Err(TripValidationError::DuplicateId(trip.id));
        }
        trips.push(trip);
    }

    sort_trips(&mut trips);
    check_history_span(&trips)?;
    Ok(ValidatedTrips { trips })
}

fn check_history_span(trips: &[Trip]) -> Result<(), TripValidationError> {
    let (Some(first), Some(last)) = (
        trips.first().map(|trip| trip.entry),
        trips.iter().map(|trip| trip.exit).max(),
    ) else {
        return Ok(());
    };

    let days = inclusive_days(first, last);
    if days > MAX_HISTORY_DAYS {
        return Err(TripValidationError::HistoryTooLong {
            first,
            last,
            days,
            max: MAX_HISTORY_DAYS,
        });
    }
    Ok(())
}

/// Validate a single prospective trip against the same rules as the history.
pub fn validate_planned_trip(
    submission: TripSubmission,
    policy: &RulePolicy,
) -> Result<Trip, TripValidationError> {
    let submission = TripSubmission {
        id: submission
            .id
            .filter(|value| !value.trim().is_empty())
            .or_else(|| Some(TripId::planned().0)),
        ..submission
    };
    Trip::from_submission(submission, 0, policy)
}

fn sort_trips(trips: &mut [Trip]) {
    trips.sort_by(|a, b| {
        a.entry
            .cmp(&b.entry)
            .then(a.exit.cmp(&b.exit))
            .then_with(|| a.id.cmp(&b.id))
    });
}

pub(crate) fn inclusive_days(start: NaiveDate, end: NaiveDate) -> u32 {
    let span = (end - start).num_days() + 1;
    u32::try_from(span.max(0)).unwrap_or(u32::MAX)
}
