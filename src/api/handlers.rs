//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{calculate_payroll, run_payroll};
use crate::config::RateTable;
use crate::models::PayPeriod;

use super::request::{CalculatePayrollRequest, RunPayrollRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll/calculate", post(calculate_handler))
        .route("/payroll/runs", post(run_handler))
        .route("/payroll/records/:year/:month", get(records_handler))
        .route(
            "/settings/rates",
            get(get_rates_handler).put(put_rates_handler),
        )
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, error: impl Into<ApiErrorResponse>) -> Response {
    let error = error.into();
    warn!(
        correlation_id = %correlation_id,
        status = error.status.as_u16(),
        code = %error.error.code,
        message = %error.error.message,
        "Request failed"
    );
    error.into_response()
}

/// Unwraps a JSON body, mapping extractor rejections to API errors.
fn parse_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // The body text carries serde's detailed message.
                    let body_text = err.body_text();
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err(error_response(
                correlation_id,
                ApiErrorResponse::new(StatusCode::BAD_REQUEST, error),
            ))
        }
    }
}

/// Handler for `POST /payroll/calculate`.
///
/// Computes one employee's record without storing it.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculatePayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll calculation request");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let rates = match state.rate_table(request.rate_table_version.as_deref(), request.period) {
        Ok(rates) => rates,
        Err(err) => return error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    match calculate_payroll(
        &request.employee,
        &request.overtime,
        &request.attendance,
        request.period,
        &rates,
        Utc::now(),
    ) {
        Ok(record) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %record.employee_id,
                period = %record.period,
                rate_table_version = %record.rate_table_version,
                gross = %record.gross_salary,
                net = %record.net_salary,
                duration_us = start_time.elapsed().as_micros(),
                "Calculation completed successfully"
            );
            json_response(StatusCode::OK, record)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for `POST /payroll/runs`.
///
/// Processes and stores a month of payroll; a period already processed for
/// any submitted employee is refused with 409.
async fn run_handler(
    State(state): State<AppState>,
    payload: Result<Json<RunPayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll run request");

    let request = match parse_body(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let rates = match state.rate_table(request.rate_table_version.as_deref(), request.period) {
        Ok(rates) => rates,
        Err(err) => return error_response(correlation_id, err),
    };

    let start_time = Instant::now();
    match run_payroll(
        state.store(),
        &request.employees,
        request.period,
        &rates,
        Utc::now(),
    ) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                period = %report.period,
                processed = report.processed_count(),
                failed = report.failed_count(),
                duration_us = start_time.elapsed().as_micros(),
                "Payroll run stored"
            );
            json_response(StatusCode::CREATED, report)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for `GET /payroll/records/:year/:month`.
async fn records_handler(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let period = match PayPeriod::new(month, year) {
        Ok(period) => period,
        Err(err) => return error_response(correlation_id, err),
    };

    match state.store().records_for(period) {
        Ok(records) => {
            info!(
                correlation_id = %correlation_id,
                period = %period,
                records = records.len(),
                "Listed payroll records"
            );
            json_response(StatusCode::OK, records)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for `GET /settings/rates`.
async fn get_rates_handler(State(state): State<AppState>) -> Response {
    match state.current_rates() {
        Some(table) => json_response(StatusCode::OK, table.as_ref()),
        None => error_response(
            Uuid::new_v4(),
            ApiErrorResponse::new(StatusCode::NOT_FOUND, ApiError::no_rate_table()),
        ),
    }
}

/// Handler for `PUT /settings/rates`.
///
/// Rejects a malformed table with 422 and every violation found.
async fn put_rates_handler(
    State(state): State<AppState>,
    payload: Result<Json<RateTable>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing rate table update");

    let table = match parse_body(correlation_id, payload) {
        Ok(table) => table,
        Err(response) => return response,
    };

    match state.save_rates(table) {
        Ok(saved) => {
            info!(
                correlation_id = %correlation_id,
                version = %saved.version,
                effective_from = %saved.effective_from,
                "Rate table saved"
            );
            json_response(StatusCode::OK, saved.as_ref())
        }
        Err(err) => error_response(correlation_id, err),
    }
}
