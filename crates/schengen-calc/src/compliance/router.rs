use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::calculator::{DailyStatus, TripProjection};
use super::countries::SchengenCountry;
use super::domain::{TripSubmission, TripValidationError};
use super::engine::ComplianceEngine;
use super::report::views::{ComplianceReportSummary, ConflictView, CountryView};

const MAX_TIMELINE_DAYS: i64 = 3 * 366;

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub trips: Vec<TripSubmission>,
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    #[serde(default)]
    pub trips: Vec<TripSubmission>,
    pub planned: TripSubmission,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub projection: TripProjection,
    pub conflicts: Vec<ConflictView>,
}

#[derive(Debug, Deserialize)]
pub struct EarliestEntryRequest {
    #[serde(default)]
    pub trips: Vec<TripSubmission>,
    pub length_days: u32,
    #[serde(default)]
    pub from: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct EarliestEntryResponse {
    pub length_days: u32,
    pub from: NaiveDate,
    pub max_stay_days: u32,
    pub earliest_entry: Option<NaiveDate>,
    pub latest_exit: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct TimelineRequest {
    #[serde(default)]
    pub trips: Vec<TripSubmission>,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Router builder exposing the rolling-window engine over HTTP.
pub fn compliance_router(engine: Arc<ComplianceEngine>) -> Router {
    Router::new()
        .route("/api/v1/compliance/check", post(check_handler))
        .route("/api/v1/compliance/plan", post(plan_handler))
        .route(
            "/api/v1/compliance/earliest-entry",
            post(earliest_entry_handler),
        )
        .route("/api/v1/compliance/timeline", post(timeline_handler))
        .route("/api/v1/schengen/countries", get(countries_handler))
        .with_state(engine)
}

pub(crate) async fn check_handler(
    State(engine): State<Arc<ComplianceEngine>>,
    Json(request): Json<CheckRequest>,
) -> Response {
    let trips = match engine.validate(request.trips) {
        Ok(trips) => trips,
        Err(error) => return validation_failure(error),
    };

    let reference = request
        .reference_date
        .unwrap_or_else(|| Local::now().date_naive());
    let summary: ComplianceReportSummary = engine.report(&trips, reference).summary();
    (StatusCode::OK, Json(summary)).into_response()
}

pub(crate) async fn plan_handler(
    State(engine): State<Arc<ComplianceEngine>>,
    Json(request): Json<PlanRequest>,
) -> Response {
    let trips = match engine.validate(request.trips) {
        Ok(trips) => trips,
        Err(error) => return validation_failure(error),
    };

    let outcome = engine
        .project_trip(&trips, request.planned.clone())
        .and_then(|projection| {
            engine
                .planned_conflicts(&trips, request.planned)
                .map(|conflicts| (projection, conflicts))
        });

    match outcome {
        Ok((projection, conflicts)) => {
            let body = PlanResponse {
                projection,
                conflicts: conflicts.iter().map(|conflict| conflict.to_view()).collect(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(error) => validation_failure(error),
    }
}

pub(crate) async fn earliest_entry_handler(
    State(engine): State<Arc<ComplianceEngine>>,
    Json(request): Json<EarliestEntryRequest>,
) -> Response {
    let max_stay_days = engine.policy().max_stay_days();
    if request.length_days == 0 || request.length_days > max_stay_days {
        let payload = json!({
            "error": format!("length_days must be between 1 and {max_stay_days}"),
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
    }

    let trips = match engine.validate(request.trips) {
        Ok(trips) => trips,
        Err(error) => return validation_failure(error),
    };

    let from = request.from.unwrap_or_else(|| Local::now().date_naive());
    let earliest_entry = engine.earliest_entry(&trips, request.length_days, from);
    let latest_exit = earliest_entry.and_then(|entry| {
        entry.checked_add_signed(chrono::Duration::days(
            i64::from(request.length_days) - 1,
        ))
    });

    let body = EarliestEntryResponse {
        length_days: request.length_days,
        from,
        max_stay_days,
        earliest_entry,
        latest_exit,
    };
    (StatusCode::OK, Json(body)).into_response()
}

pub(crate) async fn timeline_handler(
    State(engine): State<Arc<ComplianceEngine>>,
    Json(request): Json<TimelineRequest>,
) -> Response {
    let span = (request.end - request.start).num_days();
    if !(0..MAX_TIMELINE_DAYS).contains(&span) {
        let payload = json!({
            "error": format!("timeline must run forward and cover at most {MAX_TIMELINE_DAYS} days"),
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
    }

    let trips = match engine.validate(request.trips) {
        Ok(trips) => trips,
        Err(error) => return validation_failure(error),
    };

    let timeline: Vec<DailyStatus> = engine.daily_timeline(&trips, request.start, request.end);
    (StatusCode::OK, Json(timeline)).into_response()
}

pub(crate) async fn countries_handler() -> Json<Vec<CountryView>> {
    Json(
        SchengenCountry::ordered()
            .into_iter()
            .map(CountryView::from)
            .collect(),
    )
}

fn validation_failure(error: TripValidationError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
}
