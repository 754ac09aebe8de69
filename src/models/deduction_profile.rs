//! Employee deduction profile and exchange rate models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Currency;

/// The voluntary deductions an employee has elected.
///
/// HR keeps one row per employee per effective date; the row flagged
/// `active` with the latest `effective_date` is the one payroll uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDeductionProfile {
    /// The employee this profile belongs to.
    pub employee_id: String,
    /// The currency the profile was set up in.
    pub currency: Currency,
    /// Identifier of the pension fund the employee belongs to.
    #[serde(default)]
    pub pension_fund: Option<String>,
    /// Whether the employee contributes to the pension fund.
    #[serde(default = "default_true")]
    pub pension_employee_contribution: bool,
    /// Identifier of the medical aid plan.
    #[serde(default)]
    pub medical_aid: Option<String>,
    /// Identifier of the funeral cover option.
    #[serde(default)]
    pub funeral_cover: Option<String>,
    /// Identifier of the life insurance option.
    #[serde(default)]
    pub life_insurance: Option<String>,
    /// Identifier of the trade union.
    #[serde(default)]
    pub union: Option<String>,
    /// Whether this profile is currently in effect.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Date the profile took effect.
    pub effective_date: NaiveDate,
}

fn default_true() -> bool {
    true
}

/// A stored ZiG to USD exchange rate.
///
/// `rate` is the USD value of one ZiG. One row exists per calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// The date the rate was recorded for.
    pub date: NaiveDate,
    /// USD per ZiG.
    pub rate: Decimal,
}
