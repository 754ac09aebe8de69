//! Request types for the payroll API.
//!
//! JSON bodies and query strings are kept as loose strings here; the
//! [`PayrollService`](crate::payroll::PayrollService) validates them.

use serde::{Deserialize, Serialize};

/// Body of `POST /payroll/generate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The month to run as `YYYY-MM`; the current month when absent.
    #[serde(default)]
    pub period: Option<String>,
}

/// Query string of `GET /payroll`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Only records for this month (`YYYY-MM`).
    #[serde(default)]
    pub period: Option<String>,
    /// Only records in this status.
    #[serde(default)]
    pub status: Option<String>,
    /// Only records for this employee.
    #[serde(default)]
    pub employee_id: Option<String>,
}

/// Body of `POST /payroll/:id/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    /// The new status name (e.g., "Paid").
    pub status: String,
}

/// Query string of `DELETE /payroll/slip`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteSlipQuery {
    /// The employee whose slip is deleted.
    #[serde(default)]
    pub employee: Option<String>,
    /// Any date within the slip's month (`YYYY-MM-DD`).
    #[serde(default)]
    pub period: Option<String>,
}

/// Query string of `GET /payroll/preview`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreviewQuery {
    /// The employee to preview.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// The month to preview (`YYYY-MM`).
    #[serde(default)]
    pub period: Option<String>,
}
