//! Error types for binning and forecasting operations.
//!
//! This module defines [`TemporaError`] which covers every failure the period
//! engine, the numeric solvers and the forecast engine can report.

use thiserror::Error;

/// Errors that can occur while binning dates or forecasting values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporaError {
    /// The date range is missing, inverted or not contiguous.
    #[error("Invalid date range: {0}")]
    InvalidRange(String),

    /// A periodicity needs a step size parameter that was not supplied.
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    /// A supplied parameter is not usable (e.g. a non-positive step size).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Two parallel sequences differ in length where equality is required.
    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// What was being compared (e.g. "values vs bins").
        what: String,
        /// The required length.
        expected: usize,
        /// The length that was supplied.
        actual: usize,
    },

    /// A forecast was requested without any historical data.
    #[error("There is no data to forecast")]
    NoData,

    /// The requested lookback exceeds the available history.
    #[error("Insufficient data: {requested} periods requested, {available} available")]
    InsufficientData {
        /// Number of historical values (or cycles) the operation needs.
        requested: usize,
        /// Number of historical values (or cycles) that exist.
        available: usize,
    },

    /// A bounded parameter fell outside its allowed range or total.
    #[error("Value out of range: {0}")]
    ValueRange(String),

    /// A number was supplied in a representation other than exact decimal.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// A solver was called with no input values.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Decimal arithmetic failed (division by zero, overflow, negative root).
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// A periodicity name was not recognized.
    #[error("Unknown periodicity: {0}")]
    UnknownPeriodicity(String),
}

impl TemporaError {
    /// Builds a [`TemporaError::LengthMismatch`].
    #[must_use]
    pub fn length_mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }
}

/// Result type alias using [`TemporaError`].
pub type Result<T> = std::result::Result<T, TemporaError>;
