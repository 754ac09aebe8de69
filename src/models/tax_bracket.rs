//! Progressive tax bracket model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Currency;

/// One row of a progressive PAYE table.
///
/// Brackets are grouped into vintages by `active_from`. A new tax law is a new
/// set of rows with a later `active_from`; old rows are never edited.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Currency, TaxBracket};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let bracket = TaxBracket {
///     currency: Currency::Usd,
///     min_income: Decimal::from_str("750.01").unwrap(),
///     max_income: Some(Decimal::from_str("2500.00").unwrap()),
///     rate: Decimal::from_str("0.20").unwrap(),
///     deduction: Decimal::from_str("150.00").unwrap(),
///     active_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
/// };
/// assert!(bracket.covers(Decimal::from_str("2500.00").unwrap()));
/// assert!(!bracket.covers(Decimal::from_str("2500.01").unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// The currency the bracket applies to.
    pub currency: Currency,
    /// Lower income bound of the bracket.
    pub min_income: Decimal,
    /// Upper income bound (inclusive); `None` for the open-ended top bracket.
    #[serde(default)]
    pub max_income: Option<Decimal>,
    /// Marginal rate as a fraction (e.g., 0.20 for 20%).
    pub rate: Decimal,
    /// Flat amount subtracted from `income * rate`.
    pub deduction: Decimal,
    /// First date on which this bracket vintage applies.
    pub active_from: NaiveDate,
}

impl TaxBracket {
    /// Returns true if `amount` does not exceed this bracket's upper bound.
    ///
    /// The open-ended top bracket covers every amount.
    pub fn covers(&self, amount: Decimal) -> bool {
        self.max_income.is_none_or(|upper| amount <= upper)
    }
}
