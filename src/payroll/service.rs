//! Boundary operations for callers outside the engine.
//!
//! [`PayrollService`] accepts the loosely typed input of an HTTP or CLI
//! caller (period strings, status names, record ids), validates it, and
//! delegates to the [`PayrollProcessor`] and the record store.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{InMemoryPayrollStore, PayrollProcessor, PayrollRunReport, RecordFilter};
use crate::config::ConfigLoader;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    Currency, Employee, ExchangeRate, PayrollComputation, PayrollPeriod, PayrollRecord, PayrollStatus,
};

/// Source of the employees payroll is run for.
pub trait EmployeeDirectory: Send + Sync + fmt::Debug {
    /// Returns every employee, active or not.
    fn employees(&self) -> PayrollResult<Vec<Employee>>;

    /// Returns the employee with the given id, if any.
    fn find(&self, employee_id: &str) -> PayrollResult<Option<Employee>>;
}

/// An [`EmployeeDirectory`] over a fixed roster.
#[derive(Debug, Clone, Default)]
pub struct StaticEmployeeDirectory {
    employees: Vec<Employee>,
}

impl StaticEmployeeDirectory {
    /// Creates a directory over `employees`.
    pub fn new(employees: Vec<Employee>) -> Self {
        Self { employees }
    }
}

impl EmployeeDirectory for StaticEmployeeDirectory {
    fn employees(&self) -> PayrollResult<Vec<Employee>> {
        Ok(self.employees.clone())
    }

    fn find(&self, employee_id: &str) -> PayrollResult<Option<Employee>> {
        Ok(self
            .employees
            .iter()
            .find(|e| e.employee_id == employee_id)
            .cloned())
    }
}

/// The result of listing payroll records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollListing {
    /// The period filter, if one was given.
    pub period: Option<PayrollPeriod>,
    /// True if the period had no records and a run was generated first.
    pub generated: bool,
    /// Number of records returned.
    pub count: usize,
    /// The matching records, newest period first.
    pub records: Vec<PayrollRecord>,
}

/// Payroll operations keyed by caller-supplied strings.
#[derive(Debug, Clone)]
pub struct PayrollService {
    processor: PayrollProcessor,
    directory: Arc<dyn EmployeeDirectory>,
}

impl PayrollService {
    /// Creates a service over a processor and an employee directory.
    pub fn new(processor: PayrollProcessor, directory: Arc<dyn EmployeeDirectory>) -> Self {
        Self {
            processor,
            directory,
        }
    }

    /// Builds a service from a configuration directory.
    ///
    /// Rule tables and settings come from [`ConfigLoader::load`], the roster
    /// from `employees.yaml`, and records are kept in an
    /// [`InMemoryPayrollStore`].
    pub fn from_config_dir<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let path = path.as_ref();
        let (settings, tables) = ConfigLoader::load(path)?.into_parts();
        let employees = ConfigLoader::load_employees(path)?;

        let processor = PayrollProcessor::new(
            Arc::new(tables),
            Arc::new(InMemoryPayrollStore::new()),
            settings.default_exchange_rate,
        );
        Ok(Self::new(
            processor,
            Arc::new(StaticEmployeeDirectory::new(employees)),
        ))
    }

    /// Returns the underlying processor.
    pub fn processor(&self) -> &PayrollProcessor {
        &self.processor
    }

    /// Runs payroll for every active employee.
    ///
    /// # Arguments
    ///
    /// * `period` - The month as `YYYY-MM`; the current month when `None`
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidPeriod`] for a malformed period.
    pub fn generate_monthly_payroll(&self, period: Option<&str>) -> PayrollResult<PayrollRunReport> {
        let period = match period {
            Some(value) => PayrollPeriod::parse_month(value)?,
            None => PayrollPeriod::from_date(Utc::now().date_naive()),
        };
        self.run(period)
    }

    /// Lists payroll records, generating the period first if it has none.
    ///
    /// Every filter is optional. When `period` is given and no record exists
    /// for it at all, a payroll run for that period happens before the query.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidPeriod`] or [`PayrollError::InvalidStatus`]
    /// for malformed filters.
    pub fn list_payroll_records(
        &self,
        period: Option<&str>,
        status: Option<&str>,
        employee_id: Option<&str>,
    ) -> PayrollResult<PayrollListing> {
        let period = period.map(PayrollPeriod::parse_month).transpose()?;
        let status = status.map(str::parse::<PayrollStatus>).transpose()?;

        let store = self.processor.store();
        let mut generated = false;
        if let Some(period) = period {
            let existing = store.find(&RecordFilter {
                period: Some(period),
                ..RecordFilter::default()
            })?;
            if existing.is_empty() {
                self.run(period)?;
                generated = true;
            }
        }

        let records = store.find(&RecordFilter {
            period,
            status,
            employee_id: employee_id.map(str::to_string),
        })?;

        Ok(PayrollListing {
            period,
            generated,
            count: records.len(),
            records,
        })
    }

    /// Sets the workflow status of a record.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidStatus`] if `new_status` is not an exact
    /// status name, or [`PayrollError::RecordNotFound`] if no record has the id.
    /// The stored record is unchanged on error.
    pub fn update_payroll_status(
        &self,
        record_id: &str,
        new_status: &str,
    ) -> PayrollResult<PayrollRecord> {
        let status: PayrollStatus = new_status.parse()?;
        let id = Uuid::parse_str(record_id).map_err(|_| PayrollError::RecordNotFound {
            lookup: format!("id {}", record_id),
        })?;

        let record = self.processor.store().update_status(id, status)?;
        info!(record_id = %id, status = %status, "Payroll status updated");
        Ok(record)
    }

    /// Deletes the payroll slip for an employee and period.
    ///
    /// `period` is a date (`YYYY-MM-DD`) and matches the month containing it.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::MissingParams`] if either argument is absent or
    /// empty, [`PayrollError::InvalidDate`] for a malformed date, or
    /// [`PayrollError::RecordNotFound`] if there is no such slip.
    pub fn delete_payroll_slip(
        &self,
        employee_id: Option<&str>,
        period: Option<&str>,
    ) -> PayrollResult<PayrollRecord> {
        let employee_id = employee_id.filter(|v| !v.is_empty());
        let period = period.filter(|v| !v.is_empty());

        let (Some(employee_id), Some(period)) = (employee_id, period) else {
            let missing: Vec<&str> = [("employee", employee_id), ("period", period)]
                .into_iter()
                .filter(|(_, value)| value.is_none())
                .map(|(name, _)| name)
                .collect();
            return Err(PayrollError::MissingParams {
                params: missing.join(", "),
            });
        };

        let period = PayrollPeriod::parse_date(period)?;
        let record = self
            .processor
            .store()
            .delete_by_employee_and_period(employee_id, period)?;
        info!(employee_id = %employee_id, period = %period, "Payroll slip deleted");
        Ok(record)
    }

    /// Returns the newest stored exchange rate.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::ExchangeRateNotFound`] if no rate is stored.
    pub fn current_exchange_rate(&self) -> PayrollResult<ExchangeRate> {
        self.processor
            .tables()
            .latest_rate()
            .cloned()
            .ok_or(PayrollError::ExchangeRateNotFound)
    }

    /// Computes one employee's payroll for a period without persisting it.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::InvalidPeriod`] for a malformed period, or
    /// [`PayrollError::EmployeeNotFound`] if the directory has no such employee.
    pub fn preview_employee_payroll(
        &self,
        employee_id: &str,
        period: &str,
    ) -> PayrollResult<PayrollComputation> {
        let period = PayrollPeriod::parse_month(period)?;
        let employee =
            self.directory
                .find(employee_id)?
                .ok_or_else(|| PayrollError::EmployeeNotFound {
                    employee_id: employee_id.to_string(),
                })?;
        let computation = self.processor.compute_employee_payroll(&employee, period)?;
        for currency in Currency::ALL {
            let breakdown = computation.breakdown(currency);
            info!(
                employee_id = %employee.employee_id,
                period = %period,
                currency = %currency,
                gross = %breakdown.gross,
                net = %breakdown.net,
                "Payroll previewed"
            );
        }
        Ok(computation)
    }

    fn run(&self, period: PayrollPeriod) -> PayrollResult<PayrollRunReport> {
        let employees = self.directory.employees()?;
        Ok(self.processor.run_monthly_payroll(&employees, period))
    }
}
