#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tempora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for period binning and decimal forecasting.
//!
//! This crate provides the foundational abstractions shared by the period
//! engine and the forecast engine:
//!
//! - [`DateBin`](types::DateBin) - One inclusive reporting period
//! - [`BinSequence`](types::BinSequence) - Contiguous, ordered bins
//! - [`Periodicity`](periodicity::Periodicity) - Named binning rules
//! - [`StepPattern`](periodicity::StepPattern) - Cyclic step sizes
//! - [`Numeric`](types::Numeric) - Host-supplied numbers
//! - [`TemporaError`](error::TemporaError) - Error taxonomy
//! - [`checked_sum`](arith::checked_sum) - Overflow-checked decimal sums

/// Checked decimal arithmetic.
pub mod arith;
/// Error types for binning and forecasting.
pub mod error;
/// Periodicity and step pattern definitions.
pub mod periodicity;
/// Core data types (DateBin, BinSequence, Numeric).
pub mod types;

// Re-export commonly used items at crate root
pub use arith::{checked, checked_sum};
pub use error::{Result, TemporaError};
pub use periodicity::{PeriodFamily, Periodicity, StepMagnitude, StepPattern, StepSpec, StepUnit};
pub use rust_decimal::Decimal;
pub use types::{BinSequence, DateBin, Numeric, is_contiguous};
