//! Configuration types for the payroll engine.
//!
//! These types map directly onto the YAML files in a configuration
//! directory. Each table file wraps its rows in a single top-level key.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    Employee, EmployeeDeductionProfile, ExchangeRate, PensionFund, SocialSecurityCap, TaxBracket,
};

/// Engine-wide settings from `engine.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// The jurisdiction the rule tables describe (e.g., "Zimbabwe").
    pub jurisdiction: String,
    /// USD per ZiG used when no exchange rate is stored for a period.
    pub default_exchange_rate: Decimal,
}

/// `tax_brackets.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxBracketsFile {
    /// Every bracket row, across currencies and vintages.
    pub tax_brackets: Vec<TaxBracket>,
}

/// `social_security_caps.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SocialSecurityCapsFile {
    /// Every NSSA cap vintage.
    pub caps: Vec<SocialSecurityCap>,
}

/// `exchange_rates.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeRatesFile {
    /// Stored rates, one per date.
    #[serde(default)]
    pub exchange_rates: Vec<ExchangeRate>,
}

/// `pension_funds.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PensionFundsFile {
    /// The available pension funds.
    #[serde(default)]
    pub pension_funds: Vec<PensionFund>,
}

/// `deduction_profiles.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeductionProfilesFile {
    /// Employee deduction profiles, including inactive history.
    #[serde(default)]
    pub profiles: Vec<EmployeeDeductionProfile>,
}

/// `employees.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct EmployeesFile {
    /// The employee roster.
    pub employees: Vec<Employee>,
}
