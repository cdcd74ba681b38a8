use super::common::*;
use crate::compliance::policy::MAX_HISTORY_DAYS;
use crate::compliance::{ComplianceEngine, RulePolicy, SchengenCountry, TripValidationError};

#[test]
fn generates_ids_from_input_position_and_sorts() {
    let trips = history(vec![
        stay(date(2025, 5, 1), date(2025, 5, 2)),
        stay(date(2025, 1, 1), date(2025, 1, 2)),
    ]);

    let ids: Vec<_> = trips.iter().map(|trip| trip.id.0.as_str()).collect();
    assert_eq!(ids, vec!["trip-2", "trip-1"]);
}

#[test]
fn single_day_trip_counts_one_day() {
    let trips = history(vec![stay(date(2025, 3, 3), date(2025, 3, 3))]);
    assert_eq!(trips.as_slice()[0].duration_days(), 1);
    assert_eq!(engine().days_used(&trips, date(2025, 3, 3)), 1);
}

#[test]
fn rejects_exit_before_entry() {
    let result = engine().validate(vec![stay(date(2025, 3, 3), date(2025, 3, 2)).with_id("oops")]);
    match result {
        Err(TripValidationError::ExitBeforeEntry { id, entry, exit }) => {
            assert_eq!(id.0, "oops");
            assert_eq!(entry, date(2025, 3, 3));
            assert_eq!(exit, date(2025, 3, 2));
        }
        other => panic!("expected exit before entry, got {other:?}"),
    }
}

#[test]
fn rejects_duplicate_ids() {
    let result = engine().validate(vec![
        stay(date(2025, 3, 1), date(2025, 3, 2)).with_id("x"),
        stay(date(2025, 4, 1), date(2025, 4, 2)).with_id(" x "),
    ]);
    assert!(matches!(result, Err(TripValidationError::DuplicateId(id)) if id.0 == "x"));
}

#[test]
fn resolves_member_states() {
    let trips = history(vec![stay(date(2025, 3, 1), date(2025, 3, 2)).with_country("nl")]);
    let trip = &trips.as_slice()[0];
    assert_eq!(trip.member_state, Some(SchengenCountry::Netherlands));
    assert!(trip.counts_toward_allowance);
}

#[test]
fn strict_mode_rejects_unknown_countries() {
    let engine = ComplianceEngine::new(RulePolicy::default().with_strict_countries(true));
    let result = engine.validate(vec![stay(date(2025, 3, 1), date(2025, 3, 2)).with_country("Narnia")]);
    match result {
        Err(TripValidationError::UnknownCountry { country, .. }) => assert_eq!(country, "Narnia"),
        other => panic!("expected unknown country, got {other:?}"),
    }
}

#[test]
fn rejects_dates_at_calendar_limits() {
    let result = engine().validate(vec![stay(chrono::NaiveDate::MIN, chrono::NaiveDate::MIN)]);
    assert!(matches!(result, Err(TripValidationError::OutOfRange { .. })));
}

#[test]
fn rejects_trips_longer_than_supported() {
    let result = engine().validate(vec![
        stay(date(2000, 1, 1), date(2030, 1, 1)).with_id("expat"),
    ]);
    match result {
        Err(TripValidationError::TripTooLong { id, days, max }) => {
            assert_eq!(id.0, "expat");
            assert_eq!(days, 10_959);
            assert_eq!(max, MAX_HISTORY_DAYS);
        }
        other => panic!("expected trip too long, got {other:?}"),
    }
}

#[test]
fn rejects_histories_spanning_too_many_years() {
    let result = engine().validate(vec![
        stay(date(2025, 1, 1), date(2025, 1, 5)),
        stay(date(2000, 1, 1), date(2000, 1, 5)),
    ]);
    match result {
        Err(TripValidationError::HistoryTooLong { first, last, .. }) => {
            assert_eq!(first, date(2000, 1, 1));
            assert_eq!(last, date(2025, 1, 5));
        }
        other => panic!("expected history too long, got {other:?}"),
    }
}

#[test]
fn accepts_history_at_the_span_limit() {
    let first = date(2000, 1, 1);
    let last = first + chrono::Duration::days(i64::from(MAX_HISTORY_DAYS) - 1);
    let trips = history(vec![stay(first, first), stay(last, last)]);
    assert_eq!(trips.len(), 2);
}
