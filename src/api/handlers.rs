//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints. Each
//! handler parses its input, delegates to the
//! [`PayrollService`](crate::payroll::PayrollService), and maps errors to
//! [`ApiError`] bodies.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::PayrollError;

use super::request::{DeleteSlipQuery, GenerateRequest, ListQuery, PreviewQuery, StatusUpdateRequest};
use super::response::{ApiError, ApiErrorResponse, DeletedSlip};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/payroll", get(list_handler))
        .route("/payroll/generate", post(generate_handler))
        .route("/payroll/preview", get(preview_handler))
        .route("/payroll/slip", delete(delete_slip_handler))
        .route("/payroll/:id/status", post(update_status_handler))
        .route("/exchange-rate/current", get(current_rate_handler))
        .with_state(state)
}

/// Handler for POST /payroll/generate.
///
/// Runs payroll for every active employee and returns the per-employee report.
async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll generation request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match state
        .service()
        .generate_monthly_payroll(request.period.as_deref())
    {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                period = %report.period,
                created = report.created_count(),
                skipped = report.skipped_count(),
                failed = report.failures().len(),
                duration_us = start_time.elapsed().as_micros(),
                "Payroll generation completed"
            );
            json_response(StatusCode::CREATED, report)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /payroll.
///
/// Lists records matching the optional filters, generating the period first
/// if it has no records.
async fn list_handler(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        period = ?query.period,
        status = ?query.status,
        employee_id = ?query.employee_id,
        "Listing payroll records"
    );

    match state.service().list_payroll_records(
        query.period.as_deref(),
        query.status.as_deref(),
        query.employee_id.as_deref(),
    ) {
        Ok(listing) => json_response(StatusCode::OK, listing),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /payroll/:id/status.
async fn update_status_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, record_id = %id, "Processing status update");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };

    match state.service().update_payroll_status(&id, &request.status) {
        Ok(record) => json_response(StatusCode::OK, record),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for DELETE /payroll/slip.
async fn delete_slip_handler(
    State(state): State<AppState>,
    query: Result<Query<DeleteSlipQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        employee = ?query.employee,
        period = ?query.period,
        "Processing payroll slip deletion"
    );

    match state
        .service()
        .delete_payroll_slip(query.employee.as_deref(), query.period.as_deref())
    {
        Ok(record) => json_response(
            StatusCode::OK,
            DeletedSlip {
                message: format!(
                    "Payroll slip for {} in {} deleted",
                    record.employee_id, record.period
                ),
                record_id: record.id,
                employee_id: record.employee_id,
                period: record.period,
            },
        ),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /exchange-rate/current.
async fn current_rate_handler(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();

    match state.service().current_exchange_rate() {
        Ok(rate) => json_response(StatusCode::OK, rate),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for GET /payroll/preview.
///
/// Returns the full computation with its audit trace, without persisting.
async fn preview_handler(
    State(state): State<AppState>,
    query: Result<Query<PreviewQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };

    let (Some(employee_id), Some(period)) = (query.employee_id, query.period) else {
        return error_response(
            correlation_id,
            PayrollError::MissingParams {
                params: "employee_id, period".to_string(),
            },
        );
    };

    match state.service().preview_employee_payroll(&employee_id, &period) {
        Ok(computation) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                period = %computation.period,
                degraded = computation.audit_trace.is_degraded(),
                "Payroll preview computed"
            );
            json_response(StatusCode::OK, computation)
        }
        Err(err) => error_response(correlation_id, err),
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: PayrollError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    ApiErrorResponse::from(err).into_response()
}

fn json_rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
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
    json_response(StatusCode::BAD_REQUEST, error)
}

fn query_rejection_response(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %rejection,
        "Query string rejected"
    );
    json_response(
        StatusCode::BAD_REQUEST,
        ApiError::validation_error(rejection.body_text()),
    )
}
