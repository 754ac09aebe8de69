//! Computation result models for the payroll engine.
//!
//! This module contains [`PayrollComputation`] and its associated structures,
//! which capture everything derived for one employee and period before the
//! record is persisted: per-currency breakdowns, the exchange rate used, and
//! an audit trace of every rule applied.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Currency, PayrollPeriod};

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The rule table row or vintage the step drew on (e.g., "tax_brackets:USD:2024-01-01").
    pub rule_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings mark degraded computations (missing rule tables, default exchange
/// rate) that still produce a record but must be visible for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a computation.
///
/// # Example
///
/// ```
/// use payroll_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 1234,
/// };
/// assert!(!trace.is_degraded());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// Returns true if any rule degraded to a default or zero result.
    pub fn is_degraded(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Where the exchange rate applied to a computation came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ExchangeRateSource {
    /// A stored rate dated on or before the period.
    Stored {
        /// The date of the stored rate.
        date: NaiveDate,
    },
    /// No stored rate was found; the configured default was used.
    Default,
}

/// The payroll figures for one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyBreakdown {
    /// The currency of every amount in this breakdown.
    pub currency: Currency,
    /// Gross salary.
    pub gross: Decimal,
    /// PAYE from the bracket table, before the levy.
    pub base_tax: Decimal,
    /// AIDS levy on the base tax.
    pub levy: Decimal,
    /// Total tax (base tax plus levy), rounded.
    pub tax: Decimal,
    /// Earnings subject to NSSA after the ceiling.
    pub pensionable_earnings: Decimal,
    /// Employee NSSA contribution (deducted).
    pub employee_nssa: Decimal,
    /// Employer NSSA contribution (not deducted; reported for cost).
    pub employer_nssa: Decimal,
    /// Employee pension contribution (deducted).
    pub pension: Decimal,
    /// Take-home pay, never negative.
    pub net: Decimal,
}

impl CurrencyBreakdown {
    /// Returns the total deducted from gross pay.
    pub fn total_deductions(&self) -> Decimal {
        self.tax + self.employee_nssa + self.pension
    }
}

/// The unpersisted result of computing one employee's payroll for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollComputation {
    /// The employee the computation is for.
    pub employee_id: String,
    /// The period being paid.
    pub period: PayrollPeriod,
    /// USD per ZiG rate applied.
    pub exchange_rate: Decimal,
    /// Where the exchange rate came from.
    pub exchange_rate_source: ExchangeRateSource,
    /// USD figures.
    pub usd: CurrencyBreakdown,
    /// ZiG figures.
    pub zwg: CurrencyBreakdown,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl PayrollComputation {
    /// Returns the breakdown for a currency.
    pub fn breakdown(&self, currency: Currency) -> &CurrencyBreakdown {
        match currency {
            Currency::Usd => &self.usd,
            Currency::Zwg => &self.zwg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_breakdown(currency: Currency) -> CurrencyBreakdown {
        CurrencyBreakdown {
            currency,
            gross: dec("1000.00"),
            base_tax: dec("50.00"),
            levy: dec("1.50"),
            tax: dec("51.50"),
            pensionable_earnings: dec("700.00"),
            employee_nssa: dec("31.50"),
            employer_nssa: dec("31.50"),
            pension: dec("50.00"),
            net: dec("867.00"),
        }
    }

    #[test]
    fn test_total_deductions_excludes_employer_share() {
        let breakdown = create_breakdown(Currency::Usd);
        assert_eq!(breakdown.total_deductions(), dec("133.00"));
        assert_eq!(breakdown.gross - breakdown.total_deductions(), breakdown.net);
    }

    #[test]
    fn test_exchange_rate_source_serialization() {
        let stored = ExchangeRateSource::Stored {
            date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
        };
        assert_eq!(
            serde_json::to_string(&stored).unwrap(),
            r#"{"source":"stored","date":"2025-01-02"}"#
        );
        assert_eq!(
            serde_json::to_string(&ExchangeRateSource::Default).unwrap(),
            r#"{"source":"default"}"#
        );
    }

    #[test]
    fn test_audit_trace_degraded_when_warnings_present() {
        let trace = AuditTrace {
            steps: vec![],
            warnings: vec![AuditWarning {
                code: "NO_TAX_BRACKETS".to_string(),
                message: "No ZWG tax brackets active".to_string(),
                severity: "medium".to_string(),
            }],
            duration_us: 10,
        };
        assert!(trace.is_degraded());
    }

    #[test]
    fn test_breakdown_lookup_by_currency() {
        let computation = PayrollComputation {
            employee_id: "EMP0001".to_string(),
            period: PayrollPeriod::parse_month("2025-01").unwrap(),
            exchange_rate: dec("0.0380"),
            exchange_rate_source: ExchangeRateSource::Default,
            usd: create_breakdown(Currency::Usd),
            zwg: create_breakdown(Currency::Zwg),
            audit_trace: AuditTrace {
                steps: vec![],
                warnings: vec![],
                duration_us: 0,
            },
        };
        assert_eq!(computation.breakdown(Currency::Usd).currency, Currency::Usd);
        assert_eq!(computation.breakdown(Currency::Zwg).currency, Currency::Zwg);
    }

    #[test]
    fn test_audit_step_serialization() {
        let step = AuditStep {
            step_number: 1,
            rule_id: "paye".to_string(),
            rule_name: "PAYE".to_string(),
            rule_ref: "tax_brackets:USD:2024-01-01".to_string(),
            input: serde_json::json!({"taxable": "1000.00"}),
            output: serde_json::json!({"tax": "51.50"}),
            reasoning: "1000.00 x 0.20 - 150.00 = 50.00".to_string(),
        };

        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"step_number\":1"));
        assert!(json.contains("\"rule_ref\":\"tax_brackets:USD:2024-01-01\""));
    }
}
