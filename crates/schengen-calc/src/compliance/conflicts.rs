use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{inclusive_days, Trip, TripId, ValidatedTrips};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// Same dates (and country, when both list one) entered twice.
    Duplicate,
    /// One trip ends on the day the next begins; a normal border crossing.
    BorderTransfer,
    Overlap,
}

impl ConflictKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Duplicate => "Duplicate",
            Self::BorderTransfer => "Border Transfer",
            Self::Overlap => "Overlap",
        }
    }

    pub const fn is_blocking(self) -> bool {
        matches!(self, Self::Duplicate | Self::Overlap)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripConflict {
    pub first: TripId,
    pub second: TripId,
    pub kind: ConflictKind,
    pub overlap_start: NaiveDate,
    pub overlap_end: NaiveDate,
    pub overlap_days: u32,
}

impl TripConflict {
    pub fn is_blocking(&self) -> bool {
        self.kind.is_blocking()
    }

    pub fn involves(&self, id: &TripId) -> bool {
        &self.first == id || &self.second == id
    }

    pub fn describe(&self) -> String {
        match self.kind {
            ConflictKind::Duplicate => format!(
                "{} and {} record the same stay ({} -> {})",
                self.first, self.second, self.overlap_start, self.overlap_end
            ),
            ConflictKind::BorderTransfer => format!(
                "{} and {} share the crossing day {}",
                self.first, self.second, self.overlap_start
            ),
            ConflictKind::Overlap => format!(
                "{} and {} overlap for {} day(s) ({} -> {})",
                self.first, self.second, self.overlap_days, self.overlap_start, self.overlap_end
            ),
        }
    }
}

/// Pairwise conflicts between trips, including trips outside the Schengen area
/// since a traveller cannot be in two places at once.
pub fn detect_conflicts(trips: &ValidatedTrips) -> Vec<TripConflict> {
    let slice = trips.as_slice();
    let mut conflicts = Vec::new();

    for (index, first) in slice.iter().enumerate() {
        // Sorted by entry: once a later trip starts after `first` ends, none of the rest overlap.
        for second in slice[index + 1..]
            .iter()
            .take_while(|second| second.entry <= first.exit)
        {
            if let Some(conflict) = classify(first, second) {
                conflicts.push(conflict);
            }
        }
    }

    conflicts
}

fn classify(first: &Trip, second: &Trip) -> Option<TripConflict> {
    if !first.overlaps(second) {
        return None;
    }

    let overlap_start = first.entry.max(second.entry);
    let overlap_end = first.exit.min(second.exit);
    let overlap_days = inclusive_days(overlap_start, overlap_end);

    let kind = if is_duplicate(first, second) {
        ConflictKind::Duplicate
    } else if overlap_days == 1 && (first.exit == second.entry || second.exit == first.entry) {
        ConflictKind::BorderTransfer
    } else {
        ConflictKind::Overlap
    };

    Some(TripConflict {
        first: first.id.clone(),
        second: second.id.clone(),
        kind,
        overlap_start,
        overlap_end,
        overlap_days,
    })
}

fn is_duplicate(first: &Trip, second: &Trip) -> bool {
    if first.entry != second.entry || first.exit != second.exit {
        return false;
    }

    match (&first.member_state, &second.member_state) {
        (Some(a), Some(b)) => a == b,
        _ => match (&first.country, &second.country) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => true,
        },
    }
}
