//! Payroll period model.
//!
//! This module contains the [`PayrollPeriod`] type. A payroll period is a
//! calendar month, represented canonically by its first day; every
//! constructor normalizes to that day so two periods for the same month always
//! compare equal.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// A calendar month used as the payroll key.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayrollPeriod::parse_month("2025-03").unwrap();
/// assert_eq!(period.first_day(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
/// assert_eq!(period.to_string(), "2025-03");
///
/// let mid_month = PayrollPeriod::from_date(NaiveDate::from_ymd_opt(2025, 3, 17).unwrap());
/// assert_eq!(mid_month, period);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "NaiveDate", into = "NaiveDate")]
pub struct PayrollPeriod(NaiveDate);

impl PayrollPeriod {
    /// Returns the period containing the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        // Day 1 exists in every month.
        Self(date.with_day(1).unwrap_or(date))
    }

    /// Parses a `YYYY-MM` month string.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidPeriod`] if the value is not exactly a
    /// four-digit year and a two-digit month separated by a dash.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::PayrollPeriod;
    ///
    /// assert!(PayrollPeriod::parse_month("2025-12").is_ok());
    /// assert!(PayrollPeriod::parse_month("2025-13").is_err());
    /// assert!(PayrollPeriod::parse_month("2025-1").is_err());
    /// assert!(PayrollPeriod::parse_month("March 2025").is_err());
    /// ```
    pub fn parse_month(value: &str) -> PayrollResult<Self> {
        let invalid = || PayrollError::InvalidPeriod {
            value: value.to_string(),
        };

        let trimmed = value.trim();
        let bytes = trimmed.as_bytes();
        let well_formed = bytes.len() == 7
            && bytes[4] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| i == 4 || b.is_ascii_digit());
        if !well_formed {
            return Err(invalid());
        }

        let year: i32 = trimmed[..4].parse().map_err(|_| invalid())?;
        let month: u32 = trimmed[5..].parse().map_err(|_| invalid())?;
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(invalid)
    }

    /// Parses a `YYYY-MM-DD` date string and returns the month containing it.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidDate`] if the value is not a valid date.
    pub fn parse_date(value: &str) -> PayrollResult<Self> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|_| PayrollError::InvalidDate {
                value: value.to_string(),
            })
    }

    /// Returns the first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for PayrollPeriod {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl From<PayrollPeriod> for NaiveDate {
    fn from(period: PayrollPeriod) -> Self {
        period.0
    }
}

impl fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}
