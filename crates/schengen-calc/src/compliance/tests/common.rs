use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;
use std::sync::Arc;

use crate::compliance::domain::{TripSubmission, ValidatedTrips};
use crate::compliance::{compliance_router, ComplianceEngine, RulePolicy};

pub(super) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(super) fn stay(entry: NaiveDate, exit: NaiveDate) -> TripSubmission {
    TripSubmission::new(entry, exit)
}

pub(super) fn engine() -> ComplianceEngine {
    ComplianceEngine::new(RulePolicy::default())
}

pub(super) fn history(submissions: Vec<TripSubmission>) -> ValidatedTrips {
    engine().validate(submissions).expect("valid trip history")
}

/// 45 days in January/February followed by 50 days in March/April 2025.
pub(super) fn winter_and_spring() -> Vec<TripSubmission> {
    vec![
        stay(date(2025, 1, 1), date(2025, 2, 14)).with_id("winter"),
        stay(date(2025, 3, 1), date(2025, 4, 19)).with_id("spring"),
    ]
}

/// Exactly the full allowance: 1 January through 31 March 2025.
pub(super) fn full_quarter() -> Vec<TripSubmission> {
    vec![stay(date(2025, 1, 1), date(2025, 3, 31)).with_id("quarter")]
}

pub(super) fn router() -> axum::Router {
    compliance_router(Arc::new(engine()))
}

pub(super) fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}
