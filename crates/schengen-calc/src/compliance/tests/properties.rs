use super::common::*;
use crate::compliance::domain::TripSubmission;
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::HashSet;

fn base() -> NaiveDate {
    date(2024, 1, 1)
}

fn trips_strategy() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0i64..400, 0i64..60), 0..6)
}

fn submissions(ranges: &[(i64, i64)]) -> Vec<TripSubmission> {
    ranges
        .iter()
        .map(|(offset, length)| {
            let entry = base() + Duration::days(*offset);
            stay(entry, entry + Duration::days(*length))
        })
        .collect()
}

fn brute_force_days_used(ranges: &[(i64, i64)], reference: NaiveDate) -> u32 {
    let window_start = reference - Duration::days(179);
    let mut days = HashSet::new();
    for (offset, length) in ranges {
        for step in 0..=*length {
            let day = base() + Duration::days(offset + step);
            if window_start <= day && day <= reference {
                days.insert(day);
            }
        }
    }
    days.len() as u32
}

proptest! {
    #[test]
    fn days_used_matches_distinct_day_count(
        ranges in trips_strategy(),
        reference_offset in 0i64..600,
    ) {
        let engine = engine();
        let trips = history(submissions(&ranges));
        let reference = base() + Duration::days(reference_offset);

        let assessment = engine.assess(&trips, reference);
        prop_assert_eq!(assessment.days_used, brute_force_days_used(&ranges, reference));
        prop_assert!(assessment.days_used <= 180);
        prop_assert_eq!(
            assessment.days_used + assessment.days_remaining,
            90 + assessment.overstay_days
        );
        prop_assert_eq!(assessment.compliant, assessment.overstay_days == 0);
    }

    #[test]
    fn max_stay_is_the_compliance_boundary(
        ranges in trips_strategy(),
        entry_offset in 0i64..500,
    ) {
        let engine = engine();
        let trips = history(submissions(&ranges));
        let entry = base() + Duration::days(entry_offset);
        let max_stay = engine.max_stay_from(&trips, entry);

        if max_stay > 0 {
            let exit = entry + Duration::days(i64::from(max_stay) - 1);
            let projection = engine.project_trip(&trips, stay(entry, exit)).expect("valid plan");
            prop_assert!(projection.compliant);
        }
        if max_stay < 90 {
            let exit = entry + Duration::days(i64::from(max_stay));
            let projection = engine.project_trip(&trips, stay(entry, exit)).expect("valid plan");
            prop_assert!(!projection.compliant);
        }
    }

    #[test]
    fn audit_peak_bounds_every_presence_day(ranges in trips_strategy()) {
        let engine = engine();
        let trips = history(submissions(&ranges));
        let audit = engine.rolling_audit(&trips);

        for (offset, length) in &ranges {
            for step in 0..=*length {
                let day = base() + Duration::days(offset + step);
                prop_assert!(engine.days_used(&trips, day) <= audit.peak_days_used);
            }
        }
        prop_assert_eq!(audit.is_compliant(), audit.peak_days_used <= 90);
    }

    #[test]
    fn earliest_entry_is_the_first_fitting_day(
        ranges in trips_strategy(),
        from_offset in 0i64..500,
        length in 1u32..=90,
    ) {
        let engine = engine();
        let trips = history(submissions(&ranges));
        let from = base() + Duration::days(from_offset);

        let earliest = engine.earliest_entry(&trips, length, from);
        prop_assert!(earliest.is_some());
        if let Some(entry) = earliest {
            prop_assert!(entry >= from);
            prop_assert!(engine.max_stay_from(&trips, entry) >= length);
            if entry > from {
                let previous = entry - Duration::days(1);
                prop_assert!(engine.max_stay_from(&trips, previous) < length);
            }
        }
    }
}
