use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::calendar::PresenceCalendar;
use super::domain::{inclusive_days, Trip, TripId, ValidatedTrips};
use super::policy::{DateWindow, RulePolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    AtRisk,
    Overstay,
}

impl ComplianceStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Compliant => "Compliant",
            Self::AtRisk => "At Risk",
            Self::Overstay => "Overstay",
        }
    }

    fn classify(days_remaining: u32, overstay_days: u32, policy: &RulePolicy) -> Self {
        if overstay_days > 0 {
            Self::Overstay
        } else if days_remaining <= policy.at_risk_threshold() {
            Self::AtRisk
        } else {
            Self::Compliant
        }
    }
}

/// Days a single trip contributes to a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripUsage {
    pub trip_id: TripId,
    pub country: Option<String>,
    pub entry: NaiveDate,
    pub exit: NaiveDate,
    pub days_in_window: u32,
}

/// Trip outside the Schengen area, listed but never counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedTrip {
    pub trip_id: TripId,
    pub country: Option<String>,
    pub entry: NaiveDate,
    pub exit: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceAssessment {
    pub reference_date: NaiveDate,
    pub window: DateWindow,
    pub days_used: u32,
    pub days_remaining: u32,
    pub overstay_days: u32,
    pub compliant: bool,
    pub status: ComplianceStatus,
    pub trip_usage: Vec<TripUsage>,
    pub excluded_trips: Vec<ExcludedTrip>,
}

/// Consecutive presence days on which the window count exceeded the allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverstayPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub presence_days: u32,
    pub max_overstay_days: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RollingAudit {
    pub evaluated_days: u32,
    pub peak_days_used: u32,
    pub peak_date: Option<NaiveDate>,
    pub overstay_periods: Vec<OverstayPeriod>,
}

impl RollingAudit {
    pub fn is_compliant(&self) -> bool {
        self.overstay_periods.is_empty()
    }

    pub fn first_violation(&self) -> Option<NaiveDate> {
        self.overstay_periods.first().map(|period| period.start)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyStatus {
    pub date: NaiveDate,
    pub present: bool,
    pub days_used: u32,
    pub days_remaining: u32,
    pub overstay: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripProjection {
    pub trip_id: TripId,
    pub entry: NaiveDate,
    pub exit: NaiveDate,
    pub duration_days: u32,
    pub counts_toward_allowance: bool,
    pub compliant: bool,
    pub first_violation: Option<NaiveDate>,
    pub peak_days_used: u32,
    pub overstay_days: u32,
    pub days_used_on_exit: u32,
    pub days_remaining_on_exit: u32,
    pub max_stay_from_entry: u32,
    pub latest_compliant_exit: Option<NaiveDate>,
}

pub(crate) fn days_used(
    calendar: &PresenceCalendar,
    policy: &RulePolicy,
    reference: NaiveDate,
) -> u32 {
    calendar.days_within(policy.window_for(reference))
}

pub(crate) fn assess(
    trips: &ValidatedTrips,
    calendar: &PresenceCalendar,
    policy: &RulePolicy,
    reference: NaiveDate,
) -> ComplianceAssessment {
    let window = policy.window_for(reference);
    let days_used = calendar.days_within(window);
    let days_remaining = policy.max_stay_days().saturating_sub(days_used);
    let overstay_days = days_used.saturating_sub(policy.max_stay_days());

    let trip_usage = trips
        .counting()
        .filter_map(|trip| {
            let days_in_window = PresenceCalendar::from_trips([trip]).days_within(window);
            (days_in_window > 0).then(|| TripUsage {
                trip_id: trip.id.clone(),
                country: trip.country.clone(),
                entry: trip.entry,
                exit: trip.exit,
                days_in_window,
            })
        })
        .collect();

    let excluded_trips = trips
        .excluded()
        .map(|trip| ExcludedTrip {
            trip_id: trip.id.clone(),
            country: trip.country.clone(),
            entry: trip.entry,
            exit: trip.exit,
        })
        .collect();

    ComplianceAssessment {
        reference_date: reference,
        window,
        days_used,
        days_remaining,
        overstay_days,
        compliant: overstay_days == 0,
        status: ComplianceStatus::classify(days_remaining, overstay_days, policy),
        trip_usage,
        excluded_trips,
    }
}

/// Audit every presence day in `[from, to]`.
///
/// A window's count only grows on a day of presence, and an overstay is only
/// committed while present, so non-presence days are skipped.
pub(crate) fn audit_range(
    calendar: &PresenceCalendar,
    policy: &RulePolicy,
    from: NaiveDate,
    to: NaiveDate,
) -> RollingAudit {
    let mut audit = RollingAudit::default();
    let mut previous: Option<NaiveDate> = None;

    for day in calendar.presence_days_between(from, to) {
        let used = days_used(calendar, policy, day);
        audit.evaluated_days += 1;

        if used > audit.peak_days_used {
            audit.peak_days_used = used;
            audit.peak_date = Some(day);
        }

        if used > policy.max_stay_days() {
            let overstay = used - policy.max_stay_days();
            let continues = previous.and_then(|prev| prev.succ_opt()) == Some(day);
            match audit.overstay_periods.last_mut() {
                Some(period) if continues => {
                    period.end = day;
                    period.presence_days += 1;
                    period.max_overstay_days = period.max_overstay_days.max(overstay);
                }
                _ => audit.overstay_periods.push(OverstayPeriod {
                    start: day,
                    end: day,
                    presence_days: 1,
                    max_overstay_days: overstay,
                }),
            }
            previous = Some(day);
        } else {
            previous = None;
        }
    }

    audit
}

pub(crate) fn rolling_audit(calendar: &PresenceCalendar, policy: &RulePolicy) -> RollingAudit {
    match (calendar.first_day(), calendar.last_day()) {
        (Some(first), Some(last)) => audit_range(calendar, policy, first, last),
        _ => RollingAudit::default(),
    }
}

fn first_violation(
    calendar: &PresenceCalendar,
    policy: &RulePolicy,
    from: NaiveDate,
    to: NaiveDate,
) -> Option<NaiveDate> {
    calendar
        .presence_days_between(from, to)
        .find(|day| days_used(calendar, policy, *day) > policy.max_stay_days())
}

pub(crate) fn daily_timeline(
    calendar: &PresenceCalendar,
    policy: &RulePolicy,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<DailyStatus> {
    if start > end {
        return Vec::new();
    }

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|date| {
            let present = calendar.contains(date);
            let used = days_used(calendar, policy, date);
            DailyStatus {
                date,
                present,
                days_used: used,
                days_remaining: policy.max_stay_days().saturating_sub(used),
                overstay: present && used > policy.max_stay_days(),
            }
        })
        .collect()
}

fn stay_exit(entry: NaiveDate, length_days: u32) -> Option<NaiveDate> {
    let length = i64::from(length_days.checked_sub(1)?);
    entry.checked_add_signed(Duration::days(length))
}

/// Whether a continuous stay of `length_days` starting on `entry` keeps every
/// window it touches within the allowance.
pub(crate) fn stay_fits(
    calendar: &PresenceCalendar,
    policy: &RulePolicy,
    entry: NaiveDate,
    length_days: u32,
) -> bool {
    let Some(exit) = stay_exit(entry, length_days) else {
        return false;
    };
    let combined = calendar.with_stay(entry, exit);
    first_violation(&combined, policy, entry, policy.last_window_touching(exit)).is_none()
}

pub(crate) fn max_stay_from(
    calendar: &PresenceCalendar,
    policy: &RulePolicy,
    entry: NaiveDate,
) -> u32 {
    // Adding days never lowers a window's count, so the first failure is final.
    (1..=policy.max_stay_days())
        .find(|length| !stay_fits(calendar, policy, entry, *length))
        .map_or(policy.max_stay_days(), |length| length - 1)
}

pub(crate) fn earliest_entry(
    calendar: &PresenceCalendar,
    policy: &RulePolicy,
    length_days: u32,
    from: NaiveDate,
) -> Option<NaiveDate> {
    if length_days == 0 || length_days > policy.max_stay_days() {
        return None;
    }

    // Once a window no longer reaches any recorded day, any allowed length fits.
    let clear_after = calendar
        .last_day()
        .map_or(from, |last| last.max(from))
        .checked_add_signed(Duration::days(i64::from(policy.window_days())))?;

    let mut day = from;
    while day <= clear_after {
        if stay_fits(calendar, policy, day, length_days) {
            return Some(day);
        }
        day = next_candidate(calendar, policy, day)?;
    }
    None
}

/// Next entry date worth trying after `day` failed.
///
/// Inside a recorded span that has already run longer than the allowance,
/// every remaining day of the span is itself over the limit, so the whole
/// span is skipped.
fn next_candidate(
    calendar: &PresenceCalendar,
    policy: &RulePolicy,
    day: NaiveDate,
) -> Option<NaiveDate> {
    let saturated_end = calendar.span_containing(day).and_then(|(start, end)| {
        let over_limit = policy.window_days() > policy.max_stay_days()
            && inclusive_days(start, day) > policy.max_stay_days();
        over_limit.then_some(end)
    });
    saturated_end.unwrap_or(day).succ_opt()
}

pub(crate) fn project_trip(
    calendar: &PresenceCalendar,
    policy: &RulePolicy,
    planned: &Trip,
) -> TripProjection {
    let combined = if planned.counts_toward_allowance {
        calendar.with_stay(planned.entry, planned.exit)
    } else {
        calendar.clone()
    };

    let horizon = policy.last_window_touching(planned.exit);
    let audit = audit_range(&combined, policy, planned.entry, horizon);
    let days_used_on_exit = days_used(&combined, policy, planned.exit);
    let max_stay_from_entry = max_stay_from(calendar, policy, planned.entry);

    TripProjection {
        trip_id: planned.id.clone(),
        entry: planned.entry,
        exit: planned.exit,
        duration_days: planned.duration_days(),
        counts_toward_allowance: planned.counts_toward_allowance,
        compliant: audit.is_compliant(),
        first_violation: audit.first_violation(),
        peak_days_used: audit.peak_days_used,
        overstay_days: audit.peak_days_used.saturating_sub(policy.max_stay_days()),
        days_used_on_exit,
        days_remaining_on_exit: policy.max_stay_days().saturating_sub(days_used_on_exit),
        max_stay_from_entry,
        latest_compliant_exit: stay_exit(planned.entry, max_stay_from_entry),
    }
}
