//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while loading rule tables,
//! computing payroll, and managing payroll records.

use chrono::NaiveDate;
use thiserror::Error;

/// Broad classification of a [`PayrollError`].
///
/// Callers (the HTTP layer, batch runs) decide how to react based on the kind
/// rather than on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller supplied malformed or missing input.
    Validation,
    /// The requested record, employee, or rate does not exist.
    NotFound,
    /// A payroll record already exists for the employee and period.
    Conflict,
    /// Configuration, reference data, or storage failure.
    Internal,
}

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::{ErrorKind, PayrollError};
///
/// let error = PayrollError::InvalidPeriod {
///     value: "2025/01".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid period '2025/01': expected YYYY-MM");
/// assert_eq!(error.kind(), ErrorKind::Validation);
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Reference data parsed but breaks one of its invariants.
    #[error("Invalid reference data: {message}")]
    InvalidReferenceData {
        /// A description of the broken invariant.
        message: String,
    },

    /// A period string was not of the form `YYYY-MM`.
    #[error("Invalid period '{value}': expected YYYY-MM")]
    InvalidPeriod {
        /// The rejected input.
        value: String,
    },

    /// A date string was not of the form `YYYY-MM-DD`.
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        value: String,
    },

    /// One or more required parameters were not supplied.
    #[error("Missing required parameters: {params}")]
    MissingParams {
        /// Comma-separated names of the missing parameters.
        params: String,
    },

    /// A status value is not one of Draft, Pending, Processed, Failed, Paid.
    #[error("Invalid payroll status '{value}'")]
    InvalidStatus {
        /// The rejected status.
        value: String,
    },

    /// An employee record contains values the engine cannot pay from.
    #[error("Invalid employee '{employee_id}' field '{field}': {message}")]
    InvalidEmployee {
        /// The employee identifier.
        employee_id: String,
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// No payroll record matched the lookup.
    #[error("Payroll record not found: {lookup}")]
    RecordNotFound {
        /// A description of the lookup key.
        lookup: String,
    },

    /// The employee directory has no employee with this identifier.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The identifier that was not found.
        employee_id: String,
    },

    /// No exchange rate has been stored.
    #[error("No exchange rate available")]
    ExchangeRateNotFound,

    /// A payroll record already exists for the employee and period.
    #[error("Payroll record already exists for employee '{employee_id}' in period {period}")]
    Conflict {
        /// The employee identifier.
        employee_id: String,
        /// The first day of the conflicting period.
        period: NaiveDate,
    },

    /// The storage layer failed.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the failure.
        message: String,
    },
}

impl PayrollError {
    /// Returns the broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PayrollError::InvalidPeriod { .. }
            | PayrollError::InvalidDate { .. }
            | PayrollError::MissingParams { .. }
            | PayrollError::InvalidStatus { .. }
            | PayrollError::InvalidEmployee { .. } => ErrorKind::Validation,
            PayrollError::RecordNotFound { .. }
            | PayrollError::EmployeeNotFound { .. }
            | PayrollError::ExchangeRateNotFound => ErrorKind::NotFound,
            PayrollError::Conflict { .. } => ErrorKind::Conflict,
            PayrollError::ConfigNotFound { .. }
            | PayrollError::ConfigParseError { .. }
            | PayrollError::InvalidReferenceData { .. }
            | PayrollError::Storage { .. } => ErrorKind::Internal,
        }
    }
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = PayrollError::ConfigNotFound {
            path: "/missing/tax_brackets.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/tax_brackets.yaml"
        );
    }

    #[test]
    fn test_conflict_displays_employee_and_period() {
        let error = PayrollError::Conflict {
            employee_id: "EMP0001".to_string(),
            period: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Payroll record already exists for employee 'EMP0001' in period 2025-03-01"
        );
    }

    #[test]
    fn test_invalid_status_displays_value() {
        let error = PayrollError::InvalidStatus {
            value: "Archived".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid payroll status 'Archived'");
    }

    #[test]
    fn test_invalid_employee_displays_field_and_message() {
        let error = PayrollError::InvalidEmployee {
            employee_id: "EMP0002".to_string(),
            field: "usd_salary".to_string(),
            message: "cannot be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid employee 'EMP0002' field 'usd_salary': cannot be negative"
        );
    }

    #[test]
    fn test_validation_kinds() {
        let errors = [
            PayrollError::InvalidPeriod {
                value: "x".to_string(),
            },
            PayrollError::InvalidDate {
                value: "x".to_string(),
            },
            PayrollError::MissingParams {
                params: "employee".to_string(),
            },
            PayrollError::InvalidStatus {
                value: "x".to_string(),
            },
        ];
        for error in errors {
            assert_eq!(error.kind(), ErrorKind::Validation, "{error}");
        }
    }

    #[test]
    fn test_not_found_and_conflict_kinds() {
        assert_eq!(
            PayrollError::ExchangeRateNotFound.kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            PayrollError::RecordNotFound {
                lookup: "id".to_string()
            }
            .kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            PayrollError::Conflict {
                employee_id: "EMP0001".to_string(),
                period: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            }
            .kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            PayrollError::Storage {
                message: "poisoned".to_string()
            }
            .kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PayrollError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_missing_rate() -> PayrollResult<()> {
            Err(PayrollError::ExchangeRateNotFound)
        }

        fn propagates_error() -> PayrollResult<()> {
            returns_missing_rate()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
