//! HTTP request handlers for the rank engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::resolve_target_date;
use crate::client::RankService;
use crate::models::{ErrorReport, RankOutcome};

use super::request::{BatchRankRequest, RankRequest, normalize_employee, record_key};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/rank", post(rank_handler))
        .route("/rank/batch", post(batch_rank_handler))
        .with_state(state)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

/// Maps a body extraction failure to a 400 response.
fn rejection_response(rejection: JsonRejection, correlation_id: Uuid) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::new("VALIDATION_ERROR", body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    error_response(ApiErrorResponse::bad_request(error))
}

fn target_date_or_response(
    input: Option<&str>,
    correlation_id: Uuid,
) -> Result<NaiveDate, Response> {
    resolve_target_date(input).map_err(|err| {
        warn!(
            correlation_id = %correlation_id,
            error = %err,
            "Invalid target date"
        );
        error_response(err.into())
    })
}

/// Handler for POST /rank.
///
/// Returns the employee's `RankOutcome`. A record that cannot be normalized
/// or calculated is an `error` outcome, not an HTTP error.
async fn rank_handler(
    State(state): State<AppState>,
    payload: Result<Json<RankRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing rank request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let target_date = match target_date_or_response(request.target_date.as_deref(), correlation_id) {
        Ok(date) => date,
        Err(response) => return response,
    };

    let start_time = Instant::now();
    let employee = match normalize_employee(request.employee) {
        Ok(employee) => employee,
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Employee record could not be normalized"
            );
            return json_response(StatusCode::OK, RankOutcome::Error(ErrorReport::from(&err)));
        }
    };

    let service = RankService::new(state.strategy());
    match service.rank_one(&employee, target_date).await {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee.id,
                target_date = %target_date,
                ok = outcome.output().is_some(),
                duration_us = start_time.elapsed().as_micros(),
                "Rank request completed"
            );
            json_response(StatusCode::OK, outcome)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Rank request failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for POST /rank/batch.
///
/// Every record gets an outcome keyed by its ID (or `#<index>` when it has
/// none); one bad record never fails the batch.
async fn batch_rank_handler(
    State(state): State<AppState>,
    payload: Result<Json<BatchRankRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing batch rank request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(rejection, correlation_id),
    };

    let target_date = match target_date_or_response(request.target_date.as_deref(), correlation_id) {
        Ok(date) => date,
        Err(response) => return response,
    };

    let start_time = Instant::now();
    let record_count = request.employees.len();
    let mut employees = Vec::with_capacity(record_count);
    let mut rejected = Vec::new();

    for (index, value) in request.employees.into_iter().enumerate() {
        let key = record_key(&value, index);
        match normalize_employee(value) {
            Ok(employee) => employees.push(employee),
            Err(err) => {
                warn!(
                    correlation_id = %correlation_id,
                    record = %key,
                    error = %err,
                    "Employee record could not be normalized"
                );
                rejected.push((key, RankOutcome::Error(ErrorReport::from(&err))));
            }
        }
    }

    let service = RankService::new(state.strategy());
    match service.rank_batch(&employees, target_date).await {
        Ok(mut batch) => {
            for (key, outcome) in rejected {
                batch.record(key, outcome);
            }
            info!(
                correlation_id = %correlation_id,
                target_date = %target_date,
                records = record_count,
                failures = batch.failure_count(),
                duration_us = start_time.elapsed().as_micros(),
                "Batch rank request completed"
            );
            json_response(StatusCode::OK, batch)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Batch rank request failed"
            );
            error_response(err.into())
        }
    }
}
