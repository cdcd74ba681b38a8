use chrono::NaiveDate;
use tracing::debug;

use super::calculator::{
    self, ComplianceAssessment, DailyStatus, RollingAudit, TripProjection,
};
use super::calendar::PresenceCalendar;
use super::conflicts::{detect_conflicts, TripConflict};
use super::domain::{
    validate_planned_trip, validate_trips, TripSubmission, TripValidationError, ValidatedTrips,
};
use super::policy::RulePolicy;
use super::report::ComplianceReport;

/// Entry point for every rolling-window computation.
#[derive(Debug, Clone, Default)]
pub struct ComplianceEngine {
    policy: RulePolicy,
}

impl ComplianceEngine {
    pub fn new(policy: RulePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RulePolicy {
        &self.policy
    }

    pub fn validate(
        &self,
        submissions: Vec<TripSubmission>,
    ) -> Result<ValidatedTrips, TripValidationError> {
        let count = submissions.len();
        let trips = validate_trips(submissions, &self.policy)?;
        debug!(
            submitted = count,
            excluded = trips.excluded().count(),
            "validated trip history"
        );
        Ok(trips)
    }

    pub fn days_used(&self, trips: &ValidatedTrips, reference: NaiveDate) -> u32 {
        let calendar = PresenceCalendar::from_trips(trips);
        calculator::days_used(&calendar, &self.policy, reference)
    }

    pub fn days_remaining(&self, trips: &ValidatedTrips, reference: NaiveDate) -> u32 {
        self.policy
            .max_stay_days()
            .saturating_sub(self.days_used(trips, reference))
    }

    pub fn assess(&self, trips: &ValidatedTrips, reference: NaiveDate) -> ComplianceAssessment {
        let calendar = PresenceCalendar::from_trips(trips);
        let assessment = calculator::assess(trips, &calendar, &self.policy, reference);
        debug!(
            %reference,
            days_used = assessment.days_used,
            status = assessment.status.label(),
            "assessed rolling window"
        );
        assessment
    }

    pub fn rolling_audit(&self, trips: &ValidatedTrips) -> RollingAudit {
        let calendar = PresenceCalendar::from_trips(trips);
        let audit = calculator::rolling_audit(&calendar, &self.policy);
        debug!(
            evaluated_days = audit.evaluated_days,
            overstay_periods = audit.overstay_periods.len(),
            "audited trip history"
        );
        audit
    }

    pub fn daily_timeline(
        &self,
        trips: &ValidatedTrips,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<DailyStatus> {
        let calendar = PresenceCalendar::from_trips(trips);
        calculator::daily_timeline(&calendar, &self.policy, start, end)
    }

    pub fn conflicts(&self, trips: &ValidatedTrips) -> Vec<TripConflict> {
        detect_conflicts(trips)
    }

    /// Longest continuous stay beginning on `entry` that never breaks the rule.
    pub fn max_stay_from(&self, trips: &ValidatedTrips, entry: NaiveDate) -> u32 {
        let calendar = PresenceCalendar::from_trips(trips);
        calculator::max_stay_from(&calendar, &self.policy, entry)
    }

    /// First date on or after `from` that admits a stay of `length_days`.
    pub fn earliest_entry(
        &self,
        trips: &ValidatedTrips,
        length_days: u32,
        from: NaiveDate,
    ) -> Option<NaiveDate> {
        let calendar = PresenceCalendar::from_trips(trips);
        let earliest = calculator::earliest_entry(&calendar, &self.policy, length_days, from);
        debug!(length_days, %from, ?earliest, "searched earliest entry");
        earliest
    }

    pub fn project_trip(
        &self,
        trips: &ValidatedTrips,
        planned: TripSubmission,
    ) -> Result<TripProjection, TripValidationError> {
        let planned = validate_planned_trip(planned, &self.policy)?;
        let calendar = PresenceCalendar::from_trips(trips);
        let projection = calculator::project_trip(&calendar, &self.policy, &planned);
        debug!(
            entry = %projection.entry,
            exit = %projection.exit,
            compliant = projection.compliant,
            "projected planned trip"
        );
        Ok(projection)
    }

    /// Conflicts the planned trip would introduce into the history.
    pub fn planned_conflicts(
        &self,
        trips: &ValidatedTrips,
        planned: TripSubmission,
    ) -> Result<Vec<TripConflict>, TripValidationError> {
        let planned = validate_planned_trip(planned, &self.policy)?;
        let planned_id = planned.id.clone();
        let combined = trips.with_trip(planned)?;
        Ok(detect_conflicts(&combined)
            .into_iter()
            .filter(|conflict| conflict.involves(&planned_id))
            .collect())
    }

    pub fn report(&self, trips: &ValidatedTrips, reference: NaiveDate) -> ComplianceReport {
        ComplianceReport {
            assessment: self.assess(trips, reference),
            audit: self.rolling_audit(trips),
            conflicts: self.conflicts(trips),
        }
    }
}
