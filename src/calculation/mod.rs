//! Calculation logic for the payroll engine.
//!
//! This module contains the pure calculators payroll is built from: PAYE
//! with the AIDS levy, capped NSSA contributions, pension contributions,
//! net pay, and the shared money rounding rule.

mod net_pay;
mod pension;
mod rounding;
mod social_security;
mod tax;

pub use net_pay::compute_net_pay;
pub use pension::{PensionResult, compute_pension};
pub use rounding::{MONEY_DECIMAL_PLACES, round_money};
pub use social_security::{
    SocialSecurityContribution, SocialSecurityResult, compute_social_security,
};
pub use tax::{AIDS_LEVY_RATE, TaxResult, compute_tax};
