//! Schengen 90/180-day rolling-window compliance.
//!
//! Trips are validated into a sorted history, collapsed into a presence
//! calendar, and every question (days used on a date, overstays across the
//! history, how long a planned stay may last) is answered by counting presence
//! days inside the lookback window ending on the date of interest.

mod calculator;
mod calendar;
pub mod conflicts;
pub mod countries;
pub mod domain;
mod engine;
pub mod policy;
pub mod report;
pub mod router;

#[cfg(test)]
mod tests;

pub use calculator::{
    ComplianceAssessment, ComplianceStatus, DailyStatus, ExcludedTrip, OverstayPeriod,
    RollingAudit, TripProjection, TripUsage,
};
pub use conflicts::{ConflictKind, TripConflict};
pub use countries::SchengenCountry;
pub use domain::{Trip, TripId, TripSubmission, TripValidationError, ValidatedTrips};
pub use engine::ComplianceEngine;
pub use policy::{DateWindow, RulePolicy};
pub use report::ComplianceReport;
pub use router::compliance_router;
