//! Rate and bracket repository.
//!
//! Read-only, time-versioned lookups of the rule tables payroll is computed
//! from. Tables are immutable once built and shared without locking.

mod tables;

pub use tables::RuleTables;
