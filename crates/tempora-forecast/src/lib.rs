#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tempora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Forecasting over historical cycles of exact decimals.
//!
//! - [`Forecast`](engine::Forecast) - Chainable engine holding history and the latest forecast
//! - [`calculate_seasonality_factors`](seasonality::calculate_seasonality_factors) - Per-period factors averaging to 1

/// The forecast engine.
pub mod engine;
/// Seasonality factors.
pub mod seasonality;

pub use engine::Forecast;
pub use seasonality::calculate_seasonality_factors;
