//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading rule tables
//! and engine settings from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::info;

use crate::error::{PayrollError, PayrollResult};
use crate::models::Employee;
use crate::rules::RuleTables;

use super::types::{
    DeductionProfilesFile, EmployeesFile, EngineSettings, ExchangeRatesFile, PensionFundsFile,
    SocialSecurityCapsFile, TaxBracketsFile,
};

/// Loads and provides access to payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/zimbabwe/
/// ├── engine.yaml               # Jurisdiction and default exchange rate
/// ├── tax_brackets.yaml         # PAYE bracket vintages per currency
/// ├── social_security_caps.yaml # NSSA ceilings and rate
/// ├── exchange_rates.yaml       # Stored ZiG to USD rates
/// ├── pension_funds.yaml        # Pension funds
/// ├── deduction_profiles.yaml   # Employee deduction elections
/// └── employees.yaml            # Employee roster (see `load_employees`)
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::Currency;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/zimbabwe").unwrap();
/// let date = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
/// let brackets = loader.tables().active_brackets(Currency::Usd, date);
/// println!("{} USD brackets in force", brackets.len());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: EngineSettings,
    tables: RuleTables,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/zimbabwe")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The tables break an invariant (overlapping dates, rates outside 0..1)
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join("engine.yaml"))?;
        if settings.default_exchange_rate <= Decimal::ZERO {
            return Err(PayrollError::InvalidReferenceData {
                message: format!(
                    "default_exchange_rate must be positive, got {}",
                    settings.default_exchange_rate
                ),
            });
        }

        let brackets = Self::load_yaml::<TaxBracketsFile>(&path.join("tax_brackets.yaml"))?;
        let caps = Self::load_yaml::<SocialSecurityCapsFile>(&path.join("social_security_caps.yaml"))?;
        let rates = Self::load_yaml::<ExchangeRatesFile>(&path.join("exchange_rates.yaml"))?;
        let funds = Self::load_yaml::<PensionFundsFile>(&path.join("pension_funds.yaml"))?;
        let profiles =
            Self::load_yaml::<DeductionProfilesFile>(&path.join("deduction_profiles.yaml"))?;

        let tables = RuleTables::new(
            brackets.tax_brackets,
            caps.caps,
            rates.exchange_rates,
            funds.pension_funds,
            profiles.profiles,
        )?;

        info!(
            path = %path.display(),
            jurisdiction = %settings.jurisdiction,
            brackets = tables.brackets().len(),
            exchange_rates = tables.exchange_rates().len(),
            "Payroll configuration loaded"
        );

        Ok(Self { settings, tables })
    }

    /// Loads the employee roster from `employees.yaml` in a directory.
    pub fn load_employees<P: AsRef<Path>>(path: P) -> PayrollResult<Vec<Employee>> {
        let file = Self::load_yaml::<EmployeesFile>(&path.as_ref().join("employees.yaml"))?;
        Ok(file.employees)
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PayrollResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PayrollError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the loaded rule tables.
    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    /// Consumes the loader, returning the settings and rule tables.
    pub fn into_parts(self) -> (EngineSettings, RuleTables) {
        (self.settings, self.tables)
    }
}
