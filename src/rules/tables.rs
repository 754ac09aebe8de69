//! Time-versioned rule table lookups.
//!
//! This module provides [`RuleTables`], the read-only repository of tax
//! brackets, NSSA caps, exchange rates, pension funds, and deduction profiles.
//! Rule tables use a "latest vintage on or before the date" pattern: old rows
//! stay in place for audit and are never mixed into a newer calculation.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    Currency, EmployeeDeductionProfile, ExchangeRate, PensionFund, SocialSecurityCap, TaxBracket,
};

/// The immutable set of payroll rule tables.
///
/// Construct with [`RuleTables::new`], which validates the table invariants.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Currency, TaxBracket};
/// use payroll_engine::rules::RuleTables;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let bracket = TaxBracket {
///     currency: Currency::Usd,
///     min_income: Decimal::ZERO,
///     max_income: None,
///     rate: Decimal::new(20, 2),
///     deduction: Decimal::ZERO,
///     active_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
/// };
/// let tables = RuleTables::new(vec![bracket], vec![], vec![], vec![], vec![]).unwrap();
///
/// let on = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
/// assert_eq!(tables.active_brackets(Currency::Usd, on).len(), 1);
/// assert!(tables.active_brackets(Currency::Zwg, on).is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleTables {
    brackets: Vec<TaxBracket>,
    /// Sorted by `active_from` ascending.
    caps: Vec<SocialSecurityCap>,
    /// Sorted by `date` ascending.
    exchange_rates: Vec<ExchangeRate>,
    pension_funds: Vec<PensionFund>,
    profiles: Vec<EmployeeDeductionProfile>,
}

impl RuleTables {
    /// Creates rule tables from their component rows.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidReferenceData`] if:
    /// - a bracket or cap rate is outside `[0, 1]`
    /// - a bracket's `max_income` is below its `min_income`
    /// - an exchange rate is negative or two rates share a date
    /// - two deduction profiles share an `(employee, effective_date)` pair
    /// - two pension funds share an identifier
    pub fn new(
        brackets: Vec<TaxBracket>,
        caps: Vec<SocialSecurityCap>,
        exchange_rates: Vec<ExchangeRate>,
        pension_funds: Vec<PensionFund>,
        profiles: Vec<EmployeeDeductionProfile>,
    ) -> PayrollResult<Self> {
        for bracket in &brackets {
            check_fraction("tax bracket rate", bracket.rate)?;
            if let Some(max) = bracket.max_income {
                if max < bracket.min_income {
                    return Err(invalid(format!(
                        "{} bracket from {} has max_income {} below min_income {}",
                        bracket.currency, bracket.active_from, max, bracket.min_income
                    )));
                }
            }
        }

        for cap in &caps {
            check_fraction("social security rate", cap.rate)?;
        }

        let mut seen_dates = HashSet::new();
        for rate in &exchange_rates {
            if rate.rate < Decimal::ZERO {
                return Err(invalid(format!(
                    "exchange rate on {} is negative ({})",
                    rate.date, rate.rate
                )));
            }
            if !seen_dates.insert(rate.date) {
                return Err(invalid(format!(
                    "more than one exchange rate recorded for {}",
                    rate.date
                )));
            }
        }

        let mut seen_funds = HashSet::new();
        for fund in &pension_funds {
            check_fraction("pension employee rate", fund.employee_rate)?;
            check_fraction("pension employer rate", fund.employer_rate)?;
            if !seen_funds.insert(fund.id.as_str()) {
                return Err(invalid(format!("duplicate pension fund '{}'", fund.id)));
            }
        }

        let mut seen_profiles = HashSet::new();
        for profile in &profiles {
            if !seen_profiles.insert((profile.employee_id.as_str(), profile.effective_date)) {
                return Err(invalid(format!(
                    "more than one deduction profile for employee '{}' effective {}",
                    profile.employee_id, profile.effective_date
                )));
            }
        }

        let mut caps = caps;
        caps.sort_by_key(|c| c.active_from);
        let mut exchange_rates = exchange_rates;
        exchange_rates.sort_by_key(|r| r.date);

        Ok(Self {
            brackets,
            caps,
            exchange_rates,
            pension_funds,
            profiles,
        })
    }

    /// Returns the bracket vintage for a currency as of a date.
    ///
    /// Selects rows for `currency` with `active_from <= as_of`, keeps only
    /// those sharing the latest such `active_from`, and sorts them by
    /// `min_income` ascending. An empty result means no table applies and the
    /// caller computes zero tax.
    pub fn active_brackets(&self, currency: Currency, as_of: NaiveDate) -> Vec<TaxBracket> {
        let eligible = || {
            self.brackets
                .iter()
                .filter(move |b| b.currency == currency && b.active_from <= as_of)
        };

        let Some(vintage) = eligible().map(|b| b.active_from).max() else {
            return Vec::new();
        };

        let mut brackets: Vec<TaxBracket> = eligible()
            .filter(|b| b.active_from == vintage)
            .cloned()
            .collect();
        brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));
        brackets
    }

    /// Returns the NSSA cap in force for a currency as of a date.
    ///
    /// Only caps carrying a ceiling for `currency` are candidates, so each
    /// currency selects its vintage independently.
    pub fn active_cap(&self, currency: Currency, as_of: NaiveDate) -> Option<&SocialSecurityCap> {
        // Caps are sorted by active_from, so the last match is the latest vintage.
        self.caps
            .iter()
            .rfind(|c| c.active_from <= as_of && c.ceiling(currency).is_some())
    }

    /// Returns the most recent exchange rate recorded on or before `date`.
    pub fn rate_on(&self, date: NaiveDate) -> Option<&ExchangeRate> {
        self.exchange_rates.iter().rfind(|r| r.date <= date)
    }

    /// Returns the newest exchange rate on record.
    pub fn latest_rate(&self) -> Option<&ExchangeRate> {
        self.exchange_rates.last()
    }

    /// Looks up a pension fund by identifier.
    pub fn pension_fund(&self, id: &str) -> Option<&PensionFund> {
        self.pension_funds.iter().find(|f| f.id == id)
    }

    /// Returns the deduction profile currently in effect for an employee.
    ///
    /// This is the active profile with the latest `effective_date`.
    pub fn active_profile(&self, employee_id: &str) -> Option<&EmployeeDeductionProfile> {
        self.profiles
            .iter()
            .filter(|p| p.employee_id == employee_id && p.active)
            .max_by_key(|p| p.effective_date)
    }

    /// Returns every tax bracket row, across all vintages.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Returns every stored exchange rate, oldest first.
    pub fn exchange_rates(&self) -> &[ExchangeRate] {
        &self.exchange_rates
    }
}

fn invalid(message: String) -> PayrollError {
    PayrollError::InvalidReferenceData { message }
}

fn check_fraction(what: &str, value: Decimal) -> PayrollResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(invalid(format!("{} {} is outside [0, 1]", what, value)));
    }
    Ok(())
}
