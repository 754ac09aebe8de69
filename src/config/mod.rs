//! Configuration loading for the payroll engine.
//!
//! This module loads the rule tables, engine settings, and employee roster
//! from a directory of YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/zimbabwe").unwrap();
//! println!("Loaded rules for {}", config.settings().jurisdiction);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    DeductionProfilesFile, EmployeesFile, EngineSettings, ExchangeRatesFile, PensionFundsFile,
    SocialSecurityCapsFile, TaxBracketsFile,
};
