//! Core data types for binned time series.
//!
//! This module defines the fundamental data structures:
//!
//! - [`DateBin`] - One inclusive reporting period
//! - [`BinSequence`] - Ordered, contiguous collection of bins with helper methods
//! - [`Numeric`] - Loosely typed number accepted at the host boundary

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, TemporaError};

/// A single reporting period, inclusive on both ends.
///
/// Bins order by `(start, end)`, so a map keyed by the bins of a contiguous
/// sequence iterates chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DateBin {
    /// First day covered by the bin.
    pub start: NaiveDate,
    /// Last day covered by the bin.
    pub end: NaiveDate,
}

impl DateBin {
    /// Creates a bin, rejecting an end date before the start date.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(TemporaError::InvalidRange(format!(
                "bin end {end} is before bin start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Returns the number of days covered, counting both ends.
    #[must_use]
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Returns true if `date` falls inside this bin.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<DateBin> for (NaiveDate, NaiveDate) {
    fn from(bin: DateBin) -> Self {
        (bin.start, bin.end)
    }
}

/// Ordered collection of bins covering a span without gaps or overlaps.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BinSequence {
    bins: Vec<DateBin>,
}

impl BinSequence {
    /// Creates an empty sequence.
    #[must_use]
    pub const fn new() -> Self {
        Self { bins: Vec::new() }
    }

    /// Creates a sequence from a vector of bins.
    #[must_use]
    pub const fn from_bins(bins: Vec<DateBin>) -> Self {
        Self { bins }
    }

    /// Pairs period start dates into bins.
    ///
    /// `boundaries` holds `n` period start dates followed by one exclusive
    /// sentinel; each bin ends the day before the next boundary, which makes
    /// the result contiguous by construction.
    pub fn from_boundaries(boundaries: &[NaiveDate]) -> Result<Self> {
        boundaries
            .windows(2)
            .map(|pair| {
                let end = pair[1].checked_sub_days(Days::new(1)).ok_or_else(|| {
                    TemporaError::InvalidRange(format!("no day precedes {}", pair[1]))
                })?;
                DateBin::new(pair[0], end)
            })
            .collect()
    }

    /// Returns the number of bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Returns true if there are no bins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Returns an iterator over the bins.
    pub fn iter(&self) -> impl Iterator<Item = &DateBin> {
        self.bins.iter()
    }

    /// Returns the bins as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[DateBin] {
        &self.bins
    }

    /// Returns the first bin.
    #[must_use]
    pub fn first(&self) -> Option<&DateBin> {
        self.bins.first()
    }

    /// Returns the last bin.
    #[must_use]
    pub fn last(&self) -> Option<&DateBin> {
        self.bins.last()
    }

    /// Consumes the collection and returns the underlying vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<DateBin> {
        self.bins
    }

    /// Returns the first start and last end date covered.
    #[must_use]
    pub fn span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.bins.first()?.start, self.bins.last()?.end))
    }

    /// Returns the total number of days covered by all bins.
    #[must_use]
    pub fn total_days(&self) -> i64 {
        self.bins.iter().map(DateBin::day_count).sum()
    }

    /// Returns true if every bin starts the day after its predecessor ends.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        is_contiguous(&self.bins)
    }
}

/// Returns true if each adjacent pair satisfies `a.end + 1 day == b.start`.
#[must_use]
pub fn is_contiguous(bins: &[DateBin]) -> bool {
    bins.windows(2)
        .all(|pair| pair[0].end.checked_add_days(Days::new(1)) == Some(pair[1].start))
}

impl std::ops::Index<usize> for BinSequence {
    type Output = DateBin;

    fn index(&self, index: usize) -> &Self::Output {
        &self.bins[index]
    }
}

impl IntoIterator for BinSequence {
    type Item = DateBin;
    type IntoIter = std::vec::IntoIter<DateBin>;

    fn into_iter(self) -> Self::IntoIter {
        self.bins.into_iter()
    }
}

impl<'a> IntoIterator for &'a BinSequence {
    type Item = &'a DateBin;
    type IntoIter = std::slice::Iter<'a, DateBin>;

    fn into_iter(self) -> Self::IntoIter {
        self.bins.iter()
    }
}

impl FromIterator<DateBin> for BinSequence {
    fn from_iter<I: IntoIterator<Item = DateBin>>(iter: I) -> Self {
        Self {
            bins: iter.into_iter().collect(),
        }
    }
}

impl AsRef<[DateBin]> for BinSequence {
    fn as_ref(&self) -> &[DateBin] {
        &self.bins
    }
}

/// A number handed over by a host application.
///
/// Forecast arithmetic runs on exact decimals only. Integers convert
/// losslessly, missing observations count as zero, and binary floating point
/// values are refused with [`TemporaError::TypeMismatch`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Numeric {
    /// An exact decimal value.
    Decimal(Decimal),
    /// An integer value.
    Integer(i64),
    /// A binary floating point value.
    Float(f64),
    /// An absent observation.
    Missing,
}

impl Numeric {
    /// Converts to an exact decimal.
    pub fn to_decimal(self) -> Result<Decimal> {
        match self {
            Self::Decimal(d) => Ok(d),
            Self::Integer(i) => Ok(Decimal::from(i)),
            Self::Missing => Ok(Decimal::ZERO),
            Self::Float(f) => Err(TemporaError::TypeMismatch(format!(
                "{f} is a floating point number; values must be exact decimals"
            ))),
        }
    }
}

impl From<Decimal> for Numeric {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<i64> for Numeric {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Numeric {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Numeric {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl<T: Into<Self>> From<Option<T>> for Numeric {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}
