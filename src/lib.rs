//! Payroll Computation Engine for Zimbabwean multi-currency payroll
//!
//! This crate computes gross pay, PAYE with the AIDS levy, NSSA and pension
//! contributions, and net pay for salaries paid in USD and ZiG, from
//! time-versioned rule tables, and persists one payroll record per employee
//! per month.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod payroll;
pub mod rules;
