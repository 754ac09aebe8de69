//! Payroll run orchestration.
//!
//! [`PayrollProcessor`] resolves the rule tables for a period, runs the
//! calculators for each currency, and persists one `Draft` record per
//! employee. Every read happens before the single store write, so a record
//! is either written in full or not at all.

use std::sync::Arc;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::PayrollStore;
use crate::calculation::{compute_net_pay, compute_pension, compute_social_security, compute_tax};
use crate::error::{ErrorKind, PayrollError, PayrollResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, Currency, CurrencyBreakdown, Employee,
    EmployeeDeductionProfile, ExchangeRateSource, PayrollComputation, PayrollPeriod,
    PayrollRecord, PayrollStatus, PensionFund,
};
use crate::rules::RuleTables;

/// Prefix of the notes on every generated record.
pub const GENERATED_NOTES: &str = "Auto-generated payroll";

/// What happened to one employee in a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EmployeeOutcome {
    /// A new record was created.
    Created {
        /// The id of the new record.
        record_id: Uuid,
    },
    /// A record already existed for the period; nothing was written.
    AlreadyProcessed,
    /// The employee could not be processed.
    Failed {
        /// Why processing failed.
        reason: String,
    },
}

/// The outcome for one employee in a [`PayrollRunReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRunResult {
    /// The employee processed.
    pub employee_id: String,
    /// What happened.
    #[serde(flatten)]
    pub outcome: EmployeeOutcome,
}

/// The per-employee results of a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRunReport {
    /// The period the run was for.
    pub period: PayrollPeriod,
    /// One entry per active employee, in input order.
    pub results: Vec<EmployeeRunResult>,
}

impl PayrollRunReport {
    /// Returns the number of records created by the run.
    pub fn created_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, EmployeeOutcome::Created { .. }))
            .count()
    }

    /// Returns the number of employees skipped because they were already paid.
    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome == EmployeeOutcome::AlreadyProcessed)
            .count()
    }

    /// Returns the employees that failed, with the reason.
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.results
            .iter()
            .filter_map(|r| match &r.outcome {
                EmployeeOutcome::Failed { reason } => Some((r.employee_id.as_str(), reason.as_str())),
                _ => None,
            })
            .collect()
    }
}

/// Computes and persists payroll.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use payroll_engine::models::{Employee, PayrollPeriod};
/// use payroll_engine::payroll::{InMemoryPayrollStore, PayrollProcessor};
/// use payroll_engine::rules::RuleTables;
/// use rust_decimal::Decimal;
///
/// let processor = PayrollProcessor::new(
///     Arc::new(RuleTables::default()),
///     Arc::new(InMemoryPayrollStore::new()),
///     Decimal::new(5, 3),
/// );
/// let employee = Employee {
///     employee_id: "EMP0001".to_string(),
///     first_name: String::new(),
///     surname: String::new(),
///     usd_salary: Some(Decimal::new(50000, 2)),
///     zig_salary: None,
///     active: true,
/// };
/// let period = PayrollPeriod::parse_month("2025-01").unwrap();
///
/// let report = processor.run_monthly_payroll(&[employee.clone()], period);
/// assert_eq!(report.created_count(), 1);
///
/// let again = processor.run_monthly_payroll(&[employee], period);
/// assert_eq!(again.created_count(), 0);
/// assert_eq!(again.skipped_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct PayrollProcessor {
    tables: Arc<RuleTables>,
    store: Arc<dyn PayrollStore>,
    default_exchange_rate: Decimal,
}

impl PayrollProcessor {
    /// Creates a processor over shared rule tables and a record store.
    ///
    /// # Arguments
    ///
    /// * `tables` - The rule tables to compute from
    /// * `store` - Where records are persisted
    /// * `default_exchange_rate` - USD per ZiG used when no rate is stored
    pub fn new(
        tables: Arc<RuleTables>,
        store: Arc<dyn PayrollStore>,
        default_exchange_rate: Decimal,
    ) -> Self {
        Self {
            tables,
            store,
            default_exchange_rate,
        }
    }

    /// Returns the rule tables.
    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    /// Returns the record store.
    pub fn store(&self) -> &Arc<dyn PayrollStore> {
        &self.store
    }

    /// Computes an employee's payroll for a period without persisting it.
    ///
    /// Missing rule tables, an unknown pension fund, or a missing exchange
    /// rate degrade the result rather than failing it; each degradation is
    /// recorded as an [`AuditWarning`].
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidEmployee`] if a salary is negative.
    pub fn compute_employee_payroll(
        &self,
        employee: &Employee,
        period: PayrollPeriod,
    ) -> PayrollResult<PayrollComputation> {
        let start = Instant::now();
        validate_employee(employee)?;

        let as_of = period.first_day();
        let mut steps = Vec::new();
        let mut warnings = Vec::new();

        let (exchange_rate, exchange_rate_source) = match self.tables.rate_on(as_of) {
            Some(stored) => (stored.rate, ExchangeRateSource::Stored { date: stored.date }),
            None => {
                warnings.push(AuditWarning {
                    code: "DEFAULT_EXCHANGE_RATE".to_string(),
                    message: format!(
                        "No exchange rate stored on or before {}; default rate {} used",
                        as_of, self.default_exchange_rate
                    ),
                    severity: "medium".to_string(),
                });
                (self.default_exchange_rate, ExchangeRateSource::Default)
            }
        };
        steps.push(AuditStep {
            step_number: 1,
            rule_id: "exchange_rate".to_string(),
            rule_name: "Exchange Rate Lookup".to_string(),
            rule_ref: match &exchange_rate_source {
                ExchangeRateSource::Stored { date } => format!("exchange_rates:{}", date),
                ExchangeRateSource::Default => "engine:default_exchange_rate".to_string(),
            },
            input: serde_json::json!({ "as_of": as_of.to_string() }),
            output: serde_json::json!({
                "rate": exchange_rate.to_string(),
                "source": exchange_rate_source
            }),
            reasoning: format!("USD per ZiG for {} is {}", period, exchange_rate),
        });

        let profile = self.tables.active_profile(&employee.employee_id);
        let fund = self.resolve_fund(profile, &mut warnings);

        let [usd, zwg] = Currency::ALL.map(|currency| {
            self.compute_breakdown(
                employee,
                currency,
                as_of,
                (profile, fund),
                &mut steps,
                &mut warnings,
            )
        });

        for warning in &warnings {
            warn!(
                employee_id = %employee.employee_id,
                period = %period,
                code = %warning.code,
                "{}",
                warning.message
            );
        }

        let computation = PayrollComputation {
            employee_id: employee.employee_id.clone(),
            period,
            exchange_rate,
            exchange_rate_source,
            usd,
            zwg,
            audit_trace: AuditTrace {
                steps,
                warnings,
                duration_us: start.elapsed().as_micros() as u64,
            },
        };

        debug!(
            employee_id = %employee.employee_id,
            period = %period,
            net_usd = %computation.usd.net,
            net_zwg = %computation.zwg.net,
            duration_us = computation.audit_trace.duration_us,
            "Payroll computed"
        );

        Ok(computation)
    }

    /// Computes an employee's payroll and persists it as a `Draft` record.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::Conflict`] if the employee already has a record
    /// for the period, or [`PayrollError::InvalidEmployee`] if a salary is
    /// negative. Nothing is written on error.
    pub fn create_employee_payroll(
        &self,
        employee: &Employee,
        period: PayrollPeriod,
    ) -> PayrollResult<PayrollRecord> {
        let computation = self.compute_employee_payroll(employee, period)?;
        let record = build_record(&computation);
        self.store.create(record)
    }

    /// Runs payroll for every active employee for a period.
    ///
    /// Employees that already have a record are skipped. A failure for one
    /// employee is reported in the result and does not stop the batch.
    pub fn run_monthly_payroll(
        &self,
        employees: &[Employee],
        period: PayrollPeriod,
    ) -> PayrollRunReport {
        info!(period = %period, employees = employees.len(), "Payroll run started");

        let results: Vec<EmployeeRunResult> = employees
            .iter()
            .filter(|employee| employee.active)
            .map(|employee| EmployeeRunResult {
                employee_id: employee.employee_id.clone(),
                outcome: self.process_employee(employee, period),
            })
            .collect();

        let report = PayrollRunReport { period, results };
        info!(
            period = %period,
            created = report.created_count(),
            skipped = report.skipped_count(),
            failed = report.failures().len(),
            "Payroll run finished"
        );
        report
    }

    fn process_employee(&self, employee: &Employee, period: PayrollPeriod) -> EmployeeOutcome {
        match self.store.exists(&employee.employee_id, period) {
            Ok(true) => {
                debug!(employee_id = %employee.employee_id, period = %period, "Already processed");
                return EmployeeOutcome::AlreadyProcessed;
            }
            Ok(false) => {}
            Err(e) => return failed(employee, e),
        }

        match self.create_employee_payroll(employee, period) {
            Ok(record) => EmployeeOutcome::Created {
                record_id: record.id,
            },
            Err(e) if e.kind() == ErrorKind::Conflict => EmployeeOutcome::AlreadyProcessed,
            Err(e) => failed(employee, e),
        }
    }

    fn resolve_fund(
        &self,
        profile: Option<&EmployeeDeductionProfile>,
        warnings: &mut Vec<AuditWarning>,
    ) -> Option<&PensionFund> {
        let fund_id = profile?.pension_fund.as_deref()?;
        let fund = self.tables.pension_fund(fund_id);
        if fund.is_none() {
            warnings.push(AuditWarning {
                code: "UNKNOWN_PENSION_FUND".to_string(),
                message: format!("Pension fund '{}' not found; pension is 0", fund_id),
                severity: "medium".to_string(),
            });
        }
        fund
    }

    fn compute_breakdown(
        &self,
        employee: &Employee,
        currency: Currency,
        as_of: NaiveDate,
        (profile, fund): (Option<&EmployeeDeductionProfile>, Option<&PensionFund>),
        steps: &mut Vec<AuditStep>,
        warnings: &mut Vec<AuditWarning>,
    ) -> CurrencyBreakdown {
        let gross = employee.salary(currency);
        let brackets = self.tables.active_brackets(currency, as_of);
        let cap = self.tables.active_cap(currency, as_of);

        if gross > Decimal::ZERO && brackets.is_empty() {
            warnings.push(AuditWarning {
                code: "NO_TAX_BRACKETS".to_string(),
                message: format!("No {} tax brackets in force on {}; tax is 0", currency, as_of),
                severity: "high".to_string(),
            });
        }
        if gross > Decimal::ZERO && cap.is_none() {
            warnings.push(AuditWarning {
                code: "NO_SOCIAL_SECURITY_CAP".to_string(),
                message: format!("No {} NSSA cap in force on {}; NSSA is 0", currency, as_of),
                severity: "medium".to_string(),
            });
        }

        let tax = compute_tax(gross, currency, &brackets, next_step(steps));
        steps.push(tax.audit_step);

        let nssa = compute_social_security(gross, currency, cap, next_step(steps));
        steps.push(nssa.audit_step);

        let pension = compute_pension(profile, fund, gross, currency, next_step(steps));
        steps.push(pension.audit_step);

        let employee_nssa = nssa.contribution.employee_share;
        let breakdown = CurrencyBreakdown {
            currency,
            gross,
            base_tax: tax.base_tax,
            levy: tax.levy,
            tax: tax.tax,
            pensionable_earnings: nssa.contribution.pensionable_earnings,
            employee_nssa,
            employer_nssa: nssa.contribution.employer_share,
            pension: pension.amount,
            net: compute_net_pay(gross, tax.tax, employee_nssa, pension.amount),
        };

        let step_number = next_step(steps);
        steps.push(AuditStep {
            step_number,
            rule_id: "net_pay".to_string(),
            rule_name: "Net Pay".to_string(),
            rule_ref: format!("net_pay:{}", currency),
            input: serde_json::json!({
                "gross": gross.to_string(),
                "tax": breakdown.tax.to_string(),
                "nssa": employee_nssa.to_string(),
                "pension": breakdown.pension.to_string(),
                "total_deductions": breakdown.total_deductions().to_string()
            }),
            output: serde_json::json!({ "net": breakdown.net.to_string() }),
            reasoning: format!(
                "max({} - {}, 0) = {}",
                gross,
                breakdown.total_deductions(),
                breakdown.net
            ),
        });

        breakdown
    }
}

fn next_step(steps: &[AuditStep]) -> u32 {
    steps.len() as u32 + 1
}

fn validate_employee(employee: &Employee) -> PayrollResult<()> {
    for (field, salary) in [
        ("usd_salary", employee.usd_salary),
        ("zig_salary", employee.zig_salary),
    ] {
        if salary.is_some_and(|s| s < Decimal::ZERO) {
            return Err(PayrollError::InvalidEmployee {
                employee_id: employee.employee_id.clone(),
                field: field.to_string(),
                message: "salary must not be negative".to_string(),
            });
        }
    }
    Ok(())
}

fn failed(employee: &Employee, error: PayrollError) -> EmployeeOutcome {
    warn!(
        employee_id = %employee.employee_id,
        employee_name = %employee.full_name(),
        error = %error,
        "Payroll failed for employee"
    );
    EmployeeOutcome::Failed {
        reason: error.to_string(),
    }
}

fn build_record(computation: &PayrollComputation) -> PayrollRecord {
    let mut notes = format!("{} for {}", GENERATED_NOTES, computation.period);
    for warning in &computation.audit_trace.warnings {
        notes.push_str("; ");
        notes.push_str(&warning.message);
    }

    let now = Utc::now();
    PayrollRecord {
        id: Uuid::new_v4(),
        employee_id: computation.employee_id.clone(),
        period: computation.period,
        base_salary_usd: computation.usd.gross,
        base_salary_zig: computation.zwg.gross,
        net_salary_usd: computation.usd.net,
        net_salary_zig: computation.zwg.net,
        tax_usd: computation.usd.tax,
        tax_zig: computation.zwg.tax,
        nssa_usd: computation.usd.employee_nssa,
        nssa_zig: computation.zwg.employee_nssa,
        pension_usd: computation.usd.pension,
        pension_zig: computation.zwg.pension,
        exchange_rate: computation.exchange_rate,
        status: PayrollStatus::Draft,
        created_at: now,
        updated_at: now,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContributionType, CurrencyScope, ExchangeRate, SocialSecurityCap, TaxBracket};
    use crate::payroll::{InMemoryPayrollStore, RecordFilter};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn period(value: &str) -> PayrollPeriod {
        PayrollPeriod::parse_month(value).unwrap()
    }

    fn bracket(min: &str, max: Option<&str>, rate: &str, deduction: &str) -> TaxBracket {
        TaxBracket {
            currency: Currency::Usd,
            min_income: dec(min),
            max_income: max.map(dec),
            rate: dec(rate),
            deduction: dec(deduction),
            active_from: date(2024, 1, 1),
        }
    }

    fn create_test_tables() -> RuleTables {
        let brackets = vec![
            bracket("0", Some("750.00"), "0", "0"),
            bracket("750.01", Some("2500.00"), "0.20", "150.00"),
            bracket("2500.01", None, "0.25", "275.00"),
        ];
        let caps = vec![SocialSecurityCap {
            usd_cap: Some(dec("700.00")),
            zwg_cap: None,
            rate: dec("0.045"),
            contribution_type: ContributionType::Both,
            active_from: date(2024, 1, 1),
        }];
        let rates = vec![ExchangeRate {
            date: date(2025, 1, 2),
            rate: dec("0.0380"),
        }];
        let funds = vec![PensionFund {
            id: "old_mutual".to_string(),
            name: "Old Mutual Pension Fund".to_string(),
            employee_rate: dec("0.05"),
            employer_rate: dec("0.07"),
            currency_scope: CurrencyScope::Both,
        }];
        let profiles = vec![
            create_test_profile("EMP0002", Some("old_mutual")),
            create_test_profile("EMP0003", Some("missing_fund")),
        ];
        RuleTables::new(brackets, caps, rates, funds, profiles).unwrap()
    }

    fn create_test_profile(employee_id: &str, fund: Option<&str>) -> EmployeeDeductionProfile {
        EmployeeDeductionProfile {
            employee_id: employee_id.to_string(),
            currency: Currency::Usd,
            pension_fund: fund.map(str::to_string),
            pension_employee_contribution: true,
            medical_aid: None,
            funeral_cover: None,
            life_insurance: None,
            union: None,
            active: true,
            effective_date: date(2024, 1, 1),
        }
    }

    fn create_test_employee(id: &str, usd: Option<&str>, zig: Option<&str>) -> Employee {
        Employee {
            employee_id: id.to_string(),
            first_name: "Test".to_string(),
            surname: "Employee".to_string(),
            usd_salary: usd.map(dec),
            zig_salary: zig.map(dec),
            active: true,
        }
    }

    fn create_processor() -> (PayrollProcessor, Arc<InMemoryPayrollStore>) {
        let store = Arc::new(InMemoryPayrollStore::new());
        let processor = PayrollProcessor::new(
            Arc::new(create_test_tables()),
            store.clone(),
            dec("0.005"),
        );
        (processor, store)
    }

    #[test]
    fn test_compute_without_profile_has_zero_pension() {
        let (processor, _) = create_processor();
        let employee = create_test_employee("EMP0001", Some("1000.00"), None);

        let computation = processor
            .compute_employee_payroll(&employee, period("2025-02"))
            .unwrap();

        assert_eq!(computation.usd.tax, dec("51.50"));
        assert_eq!(computation.usd.employee_nssa, dec("31.50"));
        assert_eq!(computation.usd.employer_nssa, dec("31.50"));
        assert_eq!(computation.usd.pension, Decimal::ZERO);
        assert_eq!(computation.usd.net, dec("917.00"));
        assert_eq!(computation.exchange_rate, dec("0.0380"));
        assert_eq!(
            computation.exchange_rate_source,
            ExchangeRateSource::Stored { date: date(2025, 1, 2) }
        );
        assert!(!computation.audit_trace.is_degraded());
    }

    #[test]
    fn test_compute_with_pension_fund() {
        let (processor, _) = create_processor();
        let employee = create_test_employee("EMP0002", Some("1000.00"), None);

        let computation = processor
            .compute_employee_payroll(&employee, period("2025-02"))
            .unwrap();

        assert_eq!(computation.usd.pension, dec("50.00"));
        assert_eq!(computation.usd.net, dec("867.00"));
    }

    #[test]
    fn test_audit_steps_are_sequential() {
        let (processor, _) = create_processor();
        let employee = create_test_employee("EMP0002", Some("1000.00"), Some("5000.00"));

        let computation = processor
            .compute_employee_payroll(&employee, period("2025-02"))
            .unwrap();

        let steps = &computation.audit_trace.steps;
        // exchange rate, then tax, nssa, pension, net per currency
        assert_eq!(steps.len(), 9);
        for (index, step) in steps.iter().enumerate() {
            assert_eq!(step.step_number, index as u32 + 1);
        }
        assert_eq!(steps[0].rule_id, "exchange_rate");
        assert_eq!(steps[1].rule_id, "paye");
        assert_eq!(steps[4].rule_id, "net_pay");
        assert_eq!(steps[4].input["total_deductions"], "133.00");
        assert_eq!(steps[5].rule_id, "paye");
        assert_eq!(steps[5].input["currency"], "ZWG");
    }

    #[test]
    fn test_degradations_become_warnings() {
        let (processor, _) = create_processor();
        let employee = create_test_employee("EMP0003", Some("1000.00"), Some("5000.00"));

        // January 2025 predates the only stored rate
        let computation = processor
            .compute_employee_payroll(&employee, period("2025-01"))
            .unwrap();

        let codes: Vec<&str> = computation
            .audit_trace
            .warnings
            .iter()
            .map(|w| w.code.as_str())
            .collect();
        assert!(codes.contains(&"DEFAULT_EXCHANGE_RATE"));
        assert!(codes.contains(&"UNKNOWN_PENSION_FUND"));
        assert!(codes.contains(&"NO_TAX_BRACKETS"));
        assert!(codes.contains(&"NO_SOCIAL_SECURITY_CAP"));
        assert_eq!(computation.exchange_rate, dec("0.005"));
        assert_eq!(computation.exchange_rate_source, ExchangeRateSource::Default);
        assert_eq!(computation.zwg.tax, Decimal::ZERO);
        assert_eq!(computation.zwg.net, dec("5000.00"));
        assert_eq!(computation.usd.pension, Decimal::ZERO);
    }

    #[test]
    fn test_zero_salary_is_not_degraded() {
        let (processor, _) = create_processor();
        let employee = create_test_employee("EMP0001", Some("500.00"), None);

        let computation = processor
            .compute_employee_payroll(&employee, period("2025-02"))
            .unwrap();

        assert!(!computation.audit_trace.is_degraded());
        assert_eq!(computation.zwg.net, Decimal::ZERO);
    }

    #[test]
    fn test_create_record_freezes_amounts() {
        let (processor, store) = create_processor();
        let employee = create_test_employee("EMP0001", Some("1000.00"), None);

        let record = processor
            .create_employee_payroll(&employee, period("2025-02"))
            .unwrap();

        assert_eq!(record.status, PayrollStatus::Draft);
        assert_eq!(record.base_salary_usd, dec("1000.00"));
        assert_eq!(record.tax_usd, dec("51.50"));
        assert_eq!(record.nssa_usd, dec("31.50"));
        assert_eq!(record.pension_usd, Decimal::ZERO);
        assert_eq!(record.net_salary_usd, dec("917.00"));
        assert_eq!(record.exchange_rate, dec("0.0380"));
        assert_eq!(record.notes, "Auto-generated payroll for 2025-02");
        assert_eq!(store.get(record.id).unwrap(), Some(record));
    }

    #[test]
    fn test_degraded_record_notes_list_warnings() {
        let (processor, _) = create_processor();
        let employee = create_test_employee("EMP0001", Some("1000.00"), None);

        let record = processor
            .create_employee_payroll(&employee, period("2025-01"))
            .unwrap();

        assert!(record.notes.starts_with(GENERATED_NOTES));
        assert!(record.notes.contains("default rate 0.005 used"));
    }

    #[test]
    fn test_create_twice_is_conflict() {
        let (processor, _) = create_processor();
        let employee = create_test_employee("EMP0001", Some("1000.00"), None);

        processor
            .create_employee_payroll(&employee, period("2025-02"))
            .unwrap();
        let second = processor.create_employee_payroll(&employee, period("2025-02"));

        assert!(matches!(second, Err(PayrollError::Conflict { .. })));
    }

    #[test]
    fn test_negative_salary_is_invalid() {
        let (processor, store) = create_processor();
        let employee = create_test_employee("EMP0001", Some("-1.00"), None);

        let result = processor.create_employee_payroll(&employee, period("2025-02"));

        match result {
            Err(PayrollError::InvalidEmployee { field, .. }) => assert_eq!(field, "usd_salary"),
            other => panic!("Expected InvalidEmployee, got {:?}", other),
        }
        assert!(store.find(&RecordFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_run_is_idempotent() {
        let (processor, store) = create_processor();
        let employees = vec![
            create_test_employee("EMP0001", Some("1000.00"), None),
            create_test_employee("EMP0002", Some("2000.00"), Some("3000.00")),
        ];

        let first = processor.run_monthly_payroll(&employees, period("2025-02"));
        assert_eq!(first.created_count(), 2);

        let second = processor.run_monthly_payroll(&employees, period("2025-02"));
        assert_eq!(second.created_count(), 0);
        assert_eq!(second.skipped_count(), 2);
        assert_eq!(store.find(&RecordFilter::default()).unwrap().len(), 2);
    }

    #[test]
    fn test_failing_employee_does_not_stop_run() {
        let (processor, _) = create_processor();
        let employees = vec![
            create_test_employee("EMP0001", Some("-5.00"), None),
            create_test_employee("EMP0002", Some("1000.00"), None),
        ];

        let report = processor.run_monthly_payroll(&employees, period("2025-02"));

        assert_eq!(report.created_count(), 1);
        let failures = report.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "EMP0001");
        assert!(failures[0].1.contains("usd_salary"));
    }

    /// A store that reports no existing record but then rejects the insert,
    /// as when another run wins the race. Employees in `unreachable` fail the
    /// existence check.
    #[derive(Debug, Default)]
    struct ScriptedStore {
        lose_create_race: bool,
        unreachable: Vec<String>,
        records: InMemoryPayrollStore,
    }

    impl PayrollStore for ScriptedStore {
        fn create(&self, record: PayrollRecord) -> PayrollResult<PayrollRecord> {
            if self.lose_create_race {
                return Err(PayrollError::Conflict {
                    employee_id: record.employee_id.clone(),
                    period: record.period.first_day(),
                });
            }
            self.records.create(record)
        }

        fn exists(&self, employee_id: &str, period: PayrollPeriod) -> PayrollResult<bool> {
            if self.unreachable.iter().any(|id| id == employee_id) {
                return Err(PayrollError::Storage {
                    message: "connection reset".to_string(),
                });
            }
            if self.lose_create_race {
                return Ok(false);
            }
            self.records.exists(employee_id, period)
        }

        fn get(&self, id: Uuid) -> PayrollResult<Option<PayrollRecord>> {
            self.records.get(id)
        }

        fn find(&self, filter: &RecordFilter) -> PayrollResult<Vec<PayrollRecord>> {
            self.records.find(filter)
        }

        fn update_status(&self, id: Uuid, status: PayrollStatus) -> PayrollResult<PayrollRecord> {
            self.records.update_status(id, status)
        }

        fn delete_by_employee_and_period(
            &self,
            employee_id: &str,
            period: PayrollPeriod,
        ) -> PayrollResult<PayrollRecord> {
            self.records.delete_by_employee_and_period(employee_id, period)
        }
    }

    fn create_processor_with(store: ScriptedStore) -> PayrollProcessor {
        PayrollProcessor::new(Arc::new(create_test_tables()), Arc::new(store), dec("0.005"))
    }

    #[test]
    fn test_conflict_on_create_counts_as_already_processed() {
        let processor = create_processor_with(ScriptedStore {
            lose_create_race: true,
            ..ScriptedStore::default()
        });
        let employee = create_test_employee("EMP0001", Some("1000.00"), None);

        let report = processor.run_monthly_payroll(&[employee], period("2025-02"));

        assert_eq!(report.created_count(), 0);
        assert_eq!(report.skipped_count(), 1);
        assert!(report.failures().is_empty());
        assert_eq!(report.results[0].outcome, EmployeeOutcome::AlreadyProcessed);
    }

    #[test]
    fn test_storage_error_fails_employee_and_run_continues() {
        let processor = create_processor_with(ScriptedStore {
            unreachable: vec!["EMP0001".to_string()],
            ..ScriptedStore::default()
        });
        let employees = vec![
            create_test_employee("EMP0001", Some("1000.00"), None),
            create_test_employee("EMP0002", Some("1000.00"), None),
        ];

        let report = processor.run_monthly_payroll(&employees, period("2025-02"));

        assert_eq!(report.results.len(), 2);
        match &report.results[0].outcome {
            EmployeeOutcome::Failed { reason } => assert!(reason.contains("connection reset")),
            other => panic!("expected a failure, got {:?}", other),
        }
        assert_eq!(report.skipped_count(), 0);
        assert_eq!(report.created_count(), 1);
        assert_eq!(report.results[1].employee_id, "EMP0002");
    }

    #[test]
    fn test_inactive_employees_are_not_run() {
        let (processor, _) = create_processor();
        let mut inactive = create_test_employee("EMP0001", Some("1000.00"), None);
        inactive.active = false;

        let report = processor.run_monthly_payroll(&[inactive], period("2025-02"));

        assert!(report.results.is_empty());
    }

    #[test]
    fn test_duplicate_employee_in_input_is_skipped() {
        let (processor, _) = create_processor();
        let employee = create_test_employee("EMP0001", Some("1000.00"), None);

        let report =
            processor.run_monthly_payroll(&[employee.clone(), employee], period("2025-02"));

        assert_eq!(report.created_count(), 1);
        assert_eq!(report.skipped_count(), 1);
    }

    #[test]
    fn test_concurrent_runs_create_one_record_each() {
        let (processor, store) = create_processor();
        let employees: Vec<Employee> = (1..=5)
            .map(|i| create_test_employee(&format!("EMP000{}", i), Some("1000.00"), None))
            .collect();

        let created: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        processor
                            .run_monthly_payroll(&employees, period("2025-02"))
                            .created_count()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(created, 5);
        assert_eq!(store.find(&RecordFilter::default()).unwrap().len(), 5);
    }

    #[test]
    fn test_report_serialization() {
        let report = PayrollRunReport {
            period: period("2025-02"),
            results: vec![
                EmployeeRunResult {
                    employee_id: "EMP0001".to_string(),
                    outcome: EmployeeOutcome::AlreadyProcessed,
                },
                EmployeeRunResult {
                    employee_id: "EMP0002".to_string(),
                    outcome: EmployeeOutcome::Failed {
                        reason: "bad".to_string(),
                    },
                },
            ],
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["period"], "2025-02-01");
        assert_eq!(json["results"][0]["outcome"], "already_processed");
        assert_eq!(json["results"][1]["employee_id"], "EMP0002");
        assert_eq!(json["results"][1]["reason"], "bad");
    }
}
