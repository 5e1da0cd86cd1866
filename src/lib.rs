//! Statutory payroll engine for Mauritian salaried employees.
//!
//! This crate computes monthly payroll records from an employee's base
//! salary, overtime and attendance: gross pay, the statutory deductions
//! (pension, savings fund, social contribution levy, income tax, training
//! levy and guarantee fund), net pay and employer contributions. Every
//! figure is driven by a versioned [`config::RateTable`] and explained by
//! an audit trace attached to the [`models::PayrollRecord`].
//!
//! The calculation functions are pure. Batch runs go through
//! [`calculation::run_payroll`], which refuses to pay a period twice by
//! committing through a [`store::PayrollStore`]. The [`api`] module exposes
//! both over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
