//! Rate table configuration for the payroll engine.
//!
//! This module provides the statutory [`RateTable`], its validation, and
//! [`ConfigLoader`] for loading versioned tables from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/mauritius").unwrap();
//! println!("Current rates: {}", loader.current().unwrap().version);
//! ```

mod loader;
mod types;
mod validation;

pub use loader::ConfigLoader;
pub use types::{
    ContributionBase, ContributionSplit, OvertimeMultipliers, PensionRates, RateTable,
    SocialContributionRates, SteppedRate, TaxBracket, WorkingTime,
};
