//! Response types for the payroll API.
//!
//! This module defines the error response structures and the mapping from
//! [`PayrollError`] to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ErrorKind, PayrollError};
use crate::models::PayrollPeriod;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// Body returned after a payroll slip is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedSlip {
    /// Confirmation message.
    pub message: String,
    /// The id of the deleted record.
    pub record_id: Uuid,
    /// The employee the slip belonged to.
    pub employee_id: String,
    /// The month of the deleted slip.
    pub period: PayrollPeriod,
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<PayrollError> for ApiErrorResponse {
    fn from(error: PayrollError) -> Self {
        let status = match error.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let error = match &error {
            PayrollError::ConfigNotFound { .. } | PayrollError::ConfigParseError { .. } => {
                ApiError::with_details("CONFIG_ERROR", "Configuration error", error.to_string())
            }
            PayrollError::InvalidReferenceData { .. } => ApiError::with_details(
                "REFERENCE_DATA_ERROR",
                "Reference data is invalid",
                error.to_string(),
            ),
            PayrollError::InvalidPeriod { .. } => ApiError::with_details(
                "INVALID_PERIOD",
                error.to_string(),
                "Periods are calendar months written as YYYY-MM",
            ),
            PayrollError::InvalidDate { .. } => ApiError::new("INVALID_DATE", error.to_string()),
            PayrollError::MissingParams { .. } => {
                ApiError::new("MISSING_PARAMS", error.to_string())
            }
            PayrollError::InvalidStatus { .. } => ApiError::with_details(
                "INVALID_STATUS",
                error.to_string(),
                "Valid statuses are Draft, Pending, Processed, Failed, Paid",
            ),
            PayrollError::InvalidEmployee { .. } => {
                ApiError::new("INVALID_EMPLOYEE", error.to_string())
            }
            PayrollError::RecordNotFound { .. } => {
                ApiError::new("RECORD_NOT_FOUND", error.to_string())
            }
            PayrollError::EmployeeNotFound { .. } => {
                ApiError::new("EMPLOYEE_NOT_FOUND", error.to_string())
            }
            PayrollError::ExchangeRateNotFound => {
                ApiError::new("EXCHANGE_RATE_NOT_FOUND", error.to_string())
            }
            PayrollError::Conflict { .. } => ApiError::new("CONFLICT", error.to_string()),
            PayrollError::Storage { .. } => ApiError::with_details(
                "STORAGE_ERROR",
                "Storage failure",
                error.to_string(),
            ),
        };

        ApiErrorResponse { status, error }
    }
}
