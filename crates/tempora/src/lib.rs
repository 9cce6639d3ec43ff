#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tempora/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Period binning, redistribution and decimal forecasting.
//!
//! This crate re-exports the core types and, behind features, the period
//! engine, the solvers and the forecast engine. [`BinnedSeries`] carries
//! values from the period engine into the forecast engine.
//!
//! # Features
//!
//! - `binning` - Period engine and [`BinnedSeries`]
//! - `forecast` - Forecast engine and numeric solvers
//! - `polars` - `DataFrame` export of a [`BinnedSeries`]

// Core types
pub use tempora_core::*;

// Period engine
#[cfg(feature = "binning")]
pub use tempora_binning::{BinRequest, LabelAnchor, Period, Redistribution};

// Forecasting
#[cfg(feature = "forecast")]
pub use tempora_forecast::{Forecast, calculate_seasonality_factors};
#[cfg(feature = "forecast")]
pub use tempora_solvers::{LinearRegression, linear_regression, mean, polynomial_fit};

#[cfg(feature = "binning")]
mod series;
#[cfg(feature = "binning")]
pub use series::BinnedSeries;

#[cfg(feature = "polars")]
mod frame;
#[cfg(feature = "polars")]
pub use frame::to_dataframe;
