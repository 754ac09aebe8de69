//! Core data models for the payroll engine.
//!
//! This module contains the domain models used throughout the engine: the
//! rule tables, employees, computed results, and persisted payroll records.

mod computation;
mod contribution;
mod currency;
mod deduction_profile;
mod employee;
mod pay_period;
mod payroll_record;
mod tax_bracket;

pub use computation::{
    AuditStep, AuditTrace, AuditWarning, CurrencyBreakdown, ExchangeRateSource,
    PayrollComputation,
};
pub use contribution::{ContributionType, CurrencyScope, PensionFund, SocialSecurityCap};
pub use currency::{Currency, UnknownCurrency};
pub use deduction_profile::{EmployeeDeductionProfile, ExchangeRate};
pub use employee::Employee;
pub use pay_period::PayrollPeriod;
pub use payroll_record::{PayrollRecord, PayrollStatus};
pub use tax_bracket::TaxBracket;
