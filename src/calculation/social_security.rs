//! NSSA (social security) contribution calculation.
//!
//! Contributions are charged on earnings up to the ceiling of the active cap
//! for the currency being paid.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::round_money;
use crate::models::{AuditStep, Currency, SocialSecurityCap};

/// The contribution split for one salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurityContribution {
    /// Salary subject to the contribution after applying the ceiling.
    pub pensionable_earnings: Decimal,
    /// Share deducted from the employee.
    pub employee_share: Decimal,
    /// Share paid by the employer.
    pub employer_share: Decimal,
    /// Sum of both shares.
    pub total: Decimal,
}

impl SocialSecurityContribution {
    /// A contribution of zero for every component.
    pub const ZERO: Self = Self {
        pensionable_earnings: Decimal::ZERO,
        employee_share: Decimal::ZERO,
        employer_share: Decimal::ZERO,
        total: Decimal::ZERO,
    };
}

/// The result of a social security calculation, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSecurityResult {
    /// The computed contribution.
    pub contribution: SocialSecurityContribution,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes NSSA contributions for a salary.
///
/// `pensionable = min(salary, ceiling)`, and each party's share is
/// `round(pensionable * rate, 2)`, rounded independently. Parties excluded by
/// the cap's contribution type pay zero. When no cap is in force, or the cap
/// has no ceiling for `currency`, every component is zero.
///
/// # Arguments
///
/// * `salary` - Gross salary in `currency`
/// * `currency` - The currency the salary is paid in
/// * `cap` - The cap vintage in force for the period, if any
/// * `step_number` - The step number for audit trail sequencing
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::compute_social_security;
/// use payroll_engine::models::{ContributionType, Currency, SocialSecurityCap};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let cap = SocialSecurityCap {
///     usd_cap: Some(Decimal::from_str("700.00").unwrap()),
///     zwg_cap: None,
///     rate: Decimal::from_str("0.045").unwrap(),
///     contribution_type: ContributionType::Both,
///     active_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
/// };
///
/// let result = compute_social_security(Decimal::from(1000), Currency::Usd, Some(&cap), 2);
/// assert_eq!(result.contribution.pensionable_earnings, Decimal::from_str("700.00").unwrap());
/// assert_eq!(result.contribution.employee_share, Decimal::from_str("31.50").unwrap());
/// assert_eq!(result.contribution.total, Decimal::from_str("63.00").unwrap());
/// ```
pub fn compute_social_security(
    salary: Decimal,
    currency: Currency,
    cap: Option<&SocialSecurityCap>,
    step_number: u32,
) -> SocialSecurityResult {
    let resolved = cap.and_then(|c| c.ceiling(currency).map(|ceiling| (c, ceiling)));

    let Some((cap, ceiling)) = resolved else {
        return SocialSecurityResult {
            contribution: SocialSecurityContribution::ZERO,
            audit_step: AuditStep {
                step_number,
                rule_id: "nssa".to_string(),
                rule_name: "NSSA Contribution".to_string(),
                rule_ref: format!("social_security_caps:{}:none", currency),
                input: serde_json::json!({
                    "currency": currency,
                    "salary": salary.to_string()
                }),
                output: serde_json::json!({
                    "pensionable_earnings": "0",
                    "employee_share": "0",
                    "employer_share": "0"
                }),
                reasoning: format!("No {} NSSA cap in force; contributions are 0", currency),
            },
        };
    };

    let pensionable_earnings = salary.min(ceiling);
    let share = round_money(pensionable_earnings * cap.rate);
    let employee_share = if cap.contribution_type.includes_employee() {
        share
    } else {
        Decimal::ZERO
    };
    let employer_share = if cap.contribution_type.includes_employer() {
        share
    } else {
        Decimal::ZERO
    };

    let contribution = SocialSecurityContribution {
        pensionable_earnings,
        employee_share,
        employer_share,
        total: employee_share + employer_share,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "nssa".to_string(),
        rule_name: "NSSA Contribution".to_string(),
        rule_ref: format!("social_security_caps:{}:{}", currency, cap.active_from),
        input: serde_json::json!({
            "currency": currency,
            "salary": salary.to_string(),
            "ceiling": ceiling.to_string(),
            "rate": cap.rate.to_string(),
            "contribution_type": cap.contribution_type
        }),
        output: serde_json::json!({
            "pensionable_earnings": pensionable_earnings.normalize().to_string(),
            "employee_share": employee_share.to_string(),
            "employer_share": employer_share.to_string()
        }),
        reasoning: format!(
            "min({}, {}) = {} x {} = {} per party",
            salary,
            ceiling,
            pensionable_earnings.normalize(),
            cap.rate.normalize(),
            share
        ),
    };

    SocialSecurityResult {
        contribution,
        audit_step,
    }
}
