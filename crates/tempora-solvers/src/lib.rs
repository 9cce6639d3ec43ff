#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tempora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Exact-decimal numeric solvers used by the forecast engine.
//!
//! - [`mean`](stats::mean) - Arithmetic mean
//! - [`linear_regression`](regression::linear_regression) - Least-squares line
//! - [`polynomial_fit`](polyfit::polynomial_fit) - Least-squares polynomial

/// Polynomial fitting by Gaussian elimination.
pub mod polyfit;
/// Linear regression.
pub mod regression;
/// Summary statistics.
pub mod stats;

pub use polyfit::polynomial_fit;
pub use regression::{LinearRegression, linear_regression};
pub use stats::mean;
