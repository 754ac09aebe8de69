//! Payroll record persistence.
//!
//! [`PayrollStore`] is the seam between the orchestrator and whatever holds
//! payroll records. The store owns the `(employee_id, period)` uniqueness
//! invariant: [`PayrollStore::create`] checks and inserts atomically.

use std::collections::HashMap;
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{PayrollPeriod, PayrollRecord, PayrollStatus};

/// Criteria for [`PayrollStore::find`]. Unset fields match every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Only records for this period.
    pub period: Option<PayrollPeriod>,
    /// Only records in this status.
    pub status: Option<PayrollStatus>,
    /// Only records for this employee.
    pub employee_id: Option<String>,
}

impl RecordFilter {
    /// Returns true if `record` satisfies every set criterion.
    pub fn matches(&self, record: &PayrollRecord) -> bool {
        self.period.is_none_or(|p| record.period == p)
            && self.status.is_none_or(|s| record.status == s)
            && self
                .employee_id
                .as_deref()
                .is_none_or(|id| record.employee_id == id)
    }
}

/// Storage for payroll records.
///
/// Implementations must be safe to share across threads behind
/// `Arc<dyn PayrollStore>`.
pub trait PayrollStore: Send + Sync + fmt::Debug {
    /// Inserts a new record.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::Conflict`] if a record already exists for the
    /// record's employee and period. The check and the insert happen as one
    /// atomic step.
    fn create(&self, record: PayrollRecord) -> PayrollResult<PayrollRecord>;

    /// Returns true if a record exists for the employee and period.
    fn exists(&self, employee_id: &str, period: PayrollPeriod) -> PayrollResult<bool>;

    /// Returns the record with the given id, if any.
    fn get(&self, id: Uuid) -> PayrollResult<Option<PayrollRecord>>;

    /// Returns the records matching `filter`, newest period first, then by
    /// employee id.
    fn find(&self, filter: &RecordFilter) -> PayrollResult<Vec<PayrollRecord>>;

    /// Sets the status of a record and bumps its `updated_at`.
    ///
    /// Amounts are never recomputed.
    fn update_status(&self, id: Uuid, status: PayrollStatus) -> PayrollResult<PayrollRecord>;

    /// Removes the record for the employee and period, returning it.
    fn delete_by_employee_and_period(
        &self,
        employee_id: &str,
        period: PayrollPeriod,
    ) -> PayrollResult<PayrollRecord>;
}

#[derive(Debug, Default)]
struct StoreInner {
    records: HashMap<Uuid, PayrollRecord>,
    by_employee_period: HashMap<(String, PayrollPeriod), Uuid>,
}

/// A thread-safe in-memory [`PayrollStore`].
///
/// # Example
///
/// ```
/// use payroll_engine::payroll::{InMemoryPayrollStore, PayrollStore, RecordFilter};
///
/// let store = InMemoryPayrollStore::new();
/// assert!(store.find(&RecordFilter::default()).unwrap().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryPayrollStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryPayrollStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> PayrollResult<RwLockReadGuard<'_, StoreInner>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> PayrollResult<RwLockWriteGuard<'_, StoreInner>> {
        self.inner.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> PayrollError {
    PayrollError::Storage {
        message: "payroll store lock poisoned".to_string(),
    }
}

impl PayrollStore for InMemoryPayrollStore {
    fn create(&self, record: PayrollRecord) -> PayrollResult<PayrollRecord> {
        let mut inner = self.write()?;
        let key = (record.employee_id.clone(), record.period);
        if inner.by_employee_period.contains_key(&key) {
            return Err(PayrollError::Conflict {
                employee_id: record.employee_id,
                period: record.period.first_day(),
            });
        }

        inner.by_employee_period.insert(key, record.id);
        inner.records.insert(record.id, record.clone());
        debug!(
            record_id = %record.id,
            employee_id = %record.employee_id,
            period = %record.period,
            "Payroll record created"
        );
        Ok(record)
    }

    fn exists(&self, employee_id: &str, period: PayrollPeriod) -> PayrollResult<bool> {
        let inner = self.read()?;
        Ok(inner
            .by_employee_period
            .contains_key(&(employee_id.to_string(), period)))
    }

    fn get(&self, id: Uuid) -> PayrollResult<Option<PayrollRecord>> {
        let inner = self.read()?;
        Ok(inner.records.get(&id).cloned())
    }

    fn find(&self, filter: &RecordFilter) -> PayrollResult<Vec<PayrollRecord>> {
        let inner = self.read()?;
        let mut records: Vec<PayrollRecord> = inner
            .records
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.period
                .cmp(&a.period)
                .then_with(|| a.employee_id.cmp(&b.employee_id))
        });
        Ok(records)
    }

    fn update_status(&self, id: Uuid, status: PayrollStatus) -> PayrollResult<PayrollRecord> {
        let mut inner = self.write()?;
        let record = inner
            .records
            .get_mut(&id)
            .ok_or_else(|| PayrollError::RecordNotFound {
                lookup: format!("id {}", id),
            })?;
        record.status = status;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    fn delete_by_employee_and_period(
        &self,
        employee_id: &str,
        period: PayrollPeriod,
    ) -> PayrollResult<PayrollRecord> {
        let mut inner = self.write()?;
        let not_found = || PayrollError::RecordNotFound {
            lookup: format!("employee {} period {}", employee_id, period),
        };
        let id = inner
            .by_employee_period
            .remove(&(employee_id.to_string(), period))
            .ok_or_else(not_found)?;
        inner.records.remove(&id).ok_or_else(not_found)
    }
}
