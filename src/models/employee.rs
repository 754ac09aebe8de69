//! Employee model.
//!
//! Employees are owned by the HR subsystem; payroll only reads the salary
//! fields and the active flag.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Currency;

/// An employee as supplied by the HR directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee (e.g., "EMP0001").
    pub employee_id: String,
    /// The employee's first name.
    #[serde(default)]
    pub first_name: String,
    /// The employee's surname.
    #[serde(default)]
    pub surname: String,
    /// Monthly salary paid in USD, if any.
    #[serde(default)]
    pub usd_salary: Option<Decimal>,
    /// Monthly salary paid in ZiG, if any.
    #[serde(default)]
    pub zig_salary: Option<Decimal>,
    /// Whether the employee is currently on the payroll.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Employee {
    /// Returns the gross monthly salary in the given currency.
    ///
    /// A missing salary is paid as zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Currency, Employee};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     employee_id: "EMP0001".to_string(),
    ///     first_name: "Tendai".to_string(),
    ///     surname: "Moyo".to_string(),
    ///     usd_salary: Some(Decimal::new(100000, 2)),
    ///     zig_salary: None,
    ///     active: true,
    /// };
    /// assert_eq!(employee.salary(Currency::Usd), Decimal::new(100000, 2));
    /// assert_eq!(employee.salary(Currency::Zwg), Decimal::ZERO);
    /// ```
    pub fn salary(&self, currency: Currency) -> Decimal {
        let salary = match currency {
            Currency::Usd => self.usd_salary,
            Currency::Zwg => self.zig_salary,
        };
        salary.unwrap_or(Decimal::ZERO)
    }

    /// Returns the employee's display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
            .trim()
            .to_string()
    }
}
