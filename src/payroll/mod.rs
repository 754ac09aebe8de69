//! Payroll runs, record storage, and the caller-facing service.

mod processor;
mod service;
mod store;

pub use processor::{
    EmployeeOutcome, EmployeeRunResult, GENERATED_NOTES, PayrollProcessor, PayrollRunReport,
};
pub use service::{EmployeeDirectory, PayrollListing, PayrollService, StaticEmployeeDirectory};
pub use store::{InMemoryPayrollStore, PayrollStore, RecordFilter};
