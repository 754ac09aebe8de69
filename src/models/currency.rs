//! Currency codes used by payroll.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A currency in which salaries are paid.
///
/// Payroll runs every employee in both currencies independently. Parsing is
/// case-insensitive and accepts the legacy `ZWL` and `ZIG` codes for the
/// local currency. Deserialization goes through the same parser.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Currency;
///
/// assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
/// assert_eq!("ZWL".parse::<Currency>().unwrap(), Currency::Zwg);
/// assert_eq!(Currency::Zwg.code(), "ZWG");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Currency {
    /// United States dollar.
    #[serde(rename = "USD")]
    Usd,
    /// Zimbabwe Gold (ZiG), formerly the Zimbabwe dollar.
    #[serde(rename = "ZWG")]
    Zwg,
}

impl Currency {
    /// All currencies payroll is computed in, in processing order.
    pub const ALL: [Currency; 2] = [Currency::Usd, Currency::Zwg];

    /// Returns the canonical upper-case currency code.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Zwg => "ZWG",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a string is not a known currency code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown currency code '{0}'")]
pub struct UnknownCurrency(pub String);

impl FromStr for Currency {
    type Err = UnknownCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "ZWG" | "ZWL" | "ZIG" => Ok(Currency::Zwg),
            _ => Err(UnknownCurrency(s.to_string())),
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = UnknownCurrency;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
