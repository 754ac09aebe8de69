//! Persisted payroll record model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PayrollPeriod;
use crate::error::PayrollError;

/// Workflow status of a payroll record.
///
/// Records are created as `Draft`. Later transitions are workflow actions and
/// never recompute the frozen amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayrollStatus {
    /// Computed but not yet submitted.
    Draft,
    /// Submitted for approval.
    Pending,
    /// Approved and processed.
    Processed,
    /// Processing failed.
    Failed,
    /// Paid out to the employee.
    Paid,
}

impl PayrollStatus {
    /// Every valid status, in workflow order.
    pub const ALL: [PayrollStatus; 5] = [
        PayrollStatus::Draft,
        PayrollStatus::Pending,
        PayrollStatus::Processed,
        PayrollStatus::Failed,
        PayrollStatus::Paid,
    ];

    /// Returns the status name as stored.
    pub fn as_str(self) -> &'static str {
        match self {
            PayrollStatus::Draft => "Draft",
            PayrollStatus::Pending => "Pending",
            PayrollStatus::Processed => "Processed",
            PayrollStatus::Failed => "Failed",
            PayrollStatus::Paid => "Paid",
        }
    }
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PayrollStatus {
    type Err = PayrollError;

    /// Parses an exact status name.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::PayrollStatus;
    ///
    /// assert_eq!("Paid".parse::<PayrollStatus>().unwrap(), PayrollStatus::Paid);
    /// assert!("paid".parse::<PayrollStatus>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PayrollStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| PayrollError::InvalidStatus {
                value: s.to_string(),
            })
    }
}

/// One employee's payroll for one period.
///
/// Unique on `(employee_id, period)`. Amounts are frozen when the record is
/// created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The employee the record pays.
    pub employee_id: String,
    /// The month being paid.
    pub period: PayrollPeriod,
    /// Gross USD salary.
    pub base_salary_usd: Decimal,
    /// Gross ZiG salary.
    pub base_salary_zig: Decimal,
    /// USD take-home pay.
    pub net_salary_usd: Decimal,
    /// ZiG take-home pay.
    pub net_salary_zig: Decimal,
    /// PAYE plus AIDS levy on the USD salary.
    pub tax_usd: Decimal,
    /// PAYE plus AIDS levy on the ZiG salary.
    pub tax_zig: Decimal,
    /// Employee NSSA contribution on the USD salary.
    pub nssa_usd: Decimal,
    /// Employee NSSA contribution on the ZiG salary.
    pub nssa_zig: Decimal,
    /// Employee pension contribution on the USD salary.
    pub pension_usd: Decimal,
    /// Employee pension contribution on the ZiG salary.
    pub pension_zig: Decimal,
    /// USD per ZiG rate applied for the period.
    pub exchange_rate: Decimal,
    /// Workflow status.
    pub status: PayrollStatus,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
    /// Free-text notes, including any degraded computation.
    pub notes: String,
}
