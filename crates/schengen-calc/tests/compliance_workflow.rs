use chrono::NaiveDate;
use schengen_calc::compliance::{
    ComplianceEngine, ComplianceStatus, ConflictKind, RulePolicy, TripSubmission,
};
use schengen_calc::config::RuleConfig;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn digital_nomad_year() -> Vec<TripSubmission> {
    vec![
        TripSubmission::new(date(2025, 1, 6), date(2025, 1, 31))
            .with_id("lisbon")
            .with_country("Portugal"),
        TripSubmission::new(date(2025, 1, 31), date(2025, 2, 20))
            .with_id("barcelona")
            .with_country("ES"),
        TripSubmission::new(date(2025, 2, 21), date(2025, 3, 20))
            .with_id("london")
            .with_country("United Kingdom"),
        TripSubmission::new(date(2025, 3, 21), date(2025, 4, 30))
            .with_id("berlin")
            .with_country("Germany"),
    ]
}

#[test]
fn nomad_history_reports_usage_and_crossings() {
    let engine = ComplianceEngine::new(RulePolicy::default());
    let trips = engine
        .validate(digital_nomad_year())
        .expect("history validates");

    // Lisbon 26 + Barcelona 20 (31 Jan shared) + Berlin 41 = 87 days.
    let report = engine.report(&trips, date(2025, 4, 30));
    assert_eq!(report.assessment.days_used, 87);
    assert_eq!(report.assessment.days_remaining, 3);
    assert_eq!(report.assessment.status, ComplianceStatus::AtRisk);
    assert_eq!(report.assessment.excluded_trips.len(), 1);
    assert!(report.audit.is_compliant());

    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(report.conflicts[0].kind, ConflictKind::BorderTransfer);
    assert!(!report.has_blocking_conflicts());

    // Three days left, then nothing until early days start expiring.
    assert_eq!(engine.max_stay_from(&trips, date(2025, 5, 1)), 3);
    assert_eq!(
        engine.earliest_entry(&trips, 30, date(2025, 5, 4)),
        Some(date(2025, 7, 2))
    );
}

#[test]
fn policy_built_from_configuration() {
    let config = RuleConfig {
        max_stay_days: 60,
        window_days: 120,
        at_risk_threshold: 15,
        strict_countries: true,
    };
    let policy = RulePolicy::from(&config);
    assert_eq!(policy.max_stay_days(), 60);
    assert_eq!(policy.window_days(), 120);
    assert_eq!(policy.at_risk_threshold(), 15);
    assert!(policy.strict_countries());

    let engine = ComplianceEngine::new(policy);
    assert!(engine.validate(digital_nomad_year()).is_err());
}
