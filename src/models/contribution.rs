//! Statutory contribution reference data: NSSA caps and pension funds.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Currency;

/// Who pays a social-security contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionType {
    /// Only the employee contributes.
    Employee,
    /// Only the employer contributes.
    Employer,
    /// Employee and employer each contribute at the cap rate.
    #[serde(alias = "employee_and_employer")]
    Both,
}

impl ContributionType {
    /// Returns true if the employee pays a share.
    pub fn includes_employee(self) -> bool {
        matches!(self, ContributionType::Employee | ContributionType::Both)
    }

    /// Returns true if the employer pays a share.
    pub fn includes_employer(self) -> bool {
        matches!(self, ContributionType::Employer | ContributionType::Both)
    }
}

/// A social-security (NSSA) contribution ceiling vintage.
///
/// `rate` is applied to earnings up to the ceiling for the currency being
/// paid. A cap row may carry a ceiling for one currency only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurityCap {
    /// Insurable earnings ceiling for USD salaries.
    #[serde(default)]
    pub usd_cap: Option<Decimal>,
    /// Insurable earnings ceiling for ZiG salaries.
    #[serde(default)]
    pub zwg_cap: Option<Decimal>,
    /// Contribution rate as a fraction of pensionable earnings.
    pub rate: Decimal,
    /// Which parties contribute.
    pub contribution_type: ContributionType,
    /// First date on which this cap applies.
    pub active_from: NaiveDate,
}

impl SocialSecurityCap {
    /// Returns the earnings ceiling for a currency, if this cap defines one.
    pub fn ceiling(&self, currency: Currency) -> Option<Decimal> {
        match currency {
            Currency::Usd => self.usd_cap,
            Currency::Zwg => self.zwg_cap,
        }
    }
}

/// The currencies a pension fund deducts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyScope {
    /// USD salaries only.
    Usd,
    /// ZiG salaries only.
    #[serde(alias = "zwl", alias = "zig")]
    Zwg,
    /// Salaries in every currency.
    Both,
}

impl CurrencyScope {
    /// Returns true if salaries in `currency` fall within this scope.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{Currency, CurrencyScope};
    ///
    /// assert!(CurrencyScope::Both.matches(Currency::Zwg));
    /// assert!(CurrencyScope::Usd.matches(Currency::Usd));
    /// assert!(!CurrencyScope::Usd.matches(Currency::Zwg));
    /// ```
    pub fn matches(self, currency: Currency) -> bool {
        match self {
            CurrencyScope::Both => true,
            CurrencyScope::Usd => currency == Currency::Usd,
            CurrencyScope::Zwg => currency == Currency::Zwg,
        }
    }
}

/// A pension fund employees may contribute to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PensionFund {
    /// Unique identifier for the fund.
    pub id: String,
    /// Human-readable fund name.
    pub name: String,
    /// Employee contribution rate as a fraction of salary.
    pub employee_rate: Decimal,
    /// Employer contribution rate as a fraction of salary.
    pub employer_rate: Decimal,
    /// The currencies this fund deducts from.
    pub currency_scope: CurrencyScope,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_contribution_type_parties() {
        assert!(ContributionType::Employee.includes_employee());
        assert!(!ContributionType::Employee.includes_employer());
        assert!(!ContributionType::Employer.includes_employee());
        assert!(ContributionType::Employer.includes_employer());
        assert!(ContributionType::Both.includes_employee());
        assert!(ContributionType::Both.includes_employer());
    }

    #[test]
    fn test_legacy_contribution_type_alias() {
        let kind: ContributionType = serde_json::from_str("\"employee_and_employer\"").unwrap();
        assert_eq!(kind, ContributionType::Both);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"both\"");
    }

    #[test]
    fn test_cap_ceiling_per_currency() {
        let cap = SocialSecurityCap {
            usd_cap: Some(dec("700.00")),
            zwg_cap: None,
            rate: dec("0.045"),
            contribution_type: ContributionType::Both,
            active_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(cap.ceiling(Currency::Usd), Some(dec("700.00")));
        assert_eq!(cap.ceiling(Currency::Zwg), None);
    }

    #[test]
    fn test_currency_scope_aliases() {
        let scope: CurrencyScope = serde_json::from_str("\"zwl\"").unwrap();
        assert_eq!(scope, CurrencyScope::Zwg);
        assert!(scope.matches(Currency::Zwg));
        assert!(!scope.matches(Currency::Usd));
    }

    #[test]
    fn test_deserialize_pension_fund() {
        let yaml = r#"
id: old_mutual
name: Old Mutual Pension Fund
employee_rate: "0.05"
employer_rate: "0.07"
currency_scope: both
"#;
        let fund: PensionFund = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(fund.id, "old_mutual");
        assert_eq!(fund.employee_rate, dec("0.05"));
        assert_eq!(fund.currency_scope, CurrencyScope::Both);
    }
}
