use super::super::calculator::{
    ComplianceAssessment, ExcludedTrip, OverstayPeriod, RollingAudit, TripUsage,
};
use super::super::conflicts::TripConflict;
use super::views::{
    ComplianceReportSummary, ConflictView, ExcludedTripEntry, OverstayPeriodView, TripUsageEntry,
};

/// Point-in-time assessment plus the full-history audit and trip conflicts.
#[derive(Debug, Clone)]
pub struct ComplianceReport {
    pub assessment: ComplianceAssessment,
    pub audit: RollingAudit,
    pub conflicts: Vec<TripConflict>,
}

impl ComplianceReport {
    pub fn has_blocking_conflicts(&self) -> bool {
        self.conflicts.iter().any(TripConflict::is_blocking)
    }

    pub fn summary(&self) -> ComplianceReportSummary {
        let assessment = &self.assessment;

        let mut trip_usage: Vec<TripUsageEntry> = assessment
            .trip_usage
            .iter()
            .map(TripUsage::to_view)
            .collect();
        trip_usage.sort_by(|a, b| a.entry.cmp(&b.entry).then_with(|| a.trip_id.cmp(&b.trip_id)));

        ComplianceReportSummary {
            reference_date: assessment.reference_date,
            window_start: assessment.window.start,
            window_end: assessment.window.end,
            days_used: assessment.days_used,
            days_remaining: assessment.days_remaining,
            overstay_days: assessment.overstay_days,
            compliant: assessment.compliant,
            status: assessment.status,
            status_label: assessment.status.label(),
            trip_usage,
            excluded_trips: assessment
                .excluded_trips
                .iter()
                .map(ExcludedTrip::to_view)
                .collect(),
            history_compliant: self.audit.is_compliant(),
            peak_days_used: self.audit.peak_days_used,
            peak_date: self.audit.peak_date,
            overstay_periods: self
                .audit
                .overstay_periods
                .iter()
                .map(OverstayPeriod::to_view)
                .collect(),
            conflicts: self.conflicts.iter().map(TripConflict::to_view).collect(),
        }
    }
}

impl TripUsage {
    fn to_view(&self) -> TripUsageEntry {
        TripUsageEntry {
            trip_id: self.trip_id.clone(),
            country: self.country.clone(),
            entry: self.entry,
            exit: self.exit,
            days_in_window: self.days_in_window,
        }
    }
}

impl ExcludedTrip {
    fn to_view(&self) -> ExcludedTripEntry {
        ExcludedTripEntry {
            trip_id: self.trip_id.clone(),
            country: self.country.clone(),
            entry: self.entry,
            exit: self.exit,
        }
    }
}

impl OverstayPeriod {
    fn to_view(&self) -> OverstayPeriodView {
        OverstayPeriodView {
            start: self.start,
            end: self.end,
            presence_days: self.presence_days,
            max_overstay_days: self.max_overstay_days,
        }
    }
}

impl TripConflict {
    pub(crate) fn to_view(&self) -> ConflictView {
        ConflictView {
            first: self.first.clone(),
            second: self.second.clone(),
            kind: self.kind,
            kind_label: self.kind.label(),
            blocking: self.is_blocking(),
            overlap_start: self.overlap_start,
            overlap_end: self.overlap_end,
            overlap_days: self.overlap_days,
            detail: self.describe(),
        }
    }
}
