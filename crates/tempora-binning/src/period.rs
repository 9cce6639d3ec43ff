//! The period engine and its per-call request.

use chrono::{Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tempora_core::{
    BinSequence, DateBin, PeriodFamily, Periodicity, Result, StepPattern, TemporaError,
};
use tracing::debug;

use crate::{calendar, iso};

/// Engine for cutting date spans into bins.
///
/// A `Period` carries defaults (start, end, periodicity) that every call can
/// override through a [`BinRequest`], plus an optional week start that gives
/// Weekly and Biweekly bins a fixed first weekday.
///
/// # Example
///
/// ```rust,ignore
/// use chrono::NaiveDate;
/// use tempora_binning::{BinRequest, Period};
/// use tempora_core::Periodicity;
///
/// let period = Period::new()
///     .with_range(
///         NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
///         NaiveDate::from_ymd_opt(2023, 3, 15).unwrap(),
///     )
///     .with_periodicity(Periodicity::IsoWeek);
///
/// let bins = period.generate_bins(&BinRequest::new())?;
/// assert_eq!(bins.len(), 12);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    periodicity: Periodicity,
    week_start: Option<Weekday>,
}

impl Period {
    /// Creates an engine with no default dates and ISO Week periodicity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default start date.
    #[must_use]
    pub const fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    /// Sets the default end date.
    #[must_use]
    pub const fn with_end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Sets both default dates.
    #[must_use]
    pub const fn with_range(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.with_start(start).with_end(end)
    }

    /// Sets the default periodicity.
    #[must_use]
    pub const fn with_periodicity(mut self, periodicity: Periodicity) -> Self {
        self.periodicity = periodicity;
        self
    }

    /// Sets the first weekday of Weekly and Biweekly bins.
    ///
    /// Periods begin on `weekday`. When `start` falls on another weekday the
    /// first bin is a stub running from `start` to the end of the period that
    /// contains it: the day before the next `weekday` for Weekly, and the day
    /// before the `weekday` two weeks after the preceding one for Biweekly.
    #[must_use]
    pub const fn with_week_start(mut self, weekday: Weekday) -> Self {
        self.week_start = Some(weekday);
        self
    }

    /// Returns the default start date.
    #[must_use]
    pub const fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// Returns the default end date.
    #[must_use]
    pub const fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Returns the default periodicity.
    #[must_use]
    pub const fn periodicity(&self) -> Periodicity {
        self.periodicity
    }

    /// Returns the configured week start, if any.
    #[must_use]
    pub const fn week_start(&self) -> Option<Weekday> {
        self.week_start
    }

    /// Generates contiguous bins covering the requested span.
    ///
    /// Unset request fields fall back to this engine's defaults. With
    /// `inclusive` set the last bin ends on `end`, otherwise on the day
    /// before.
    ///
    /// # Errors
    ///
    /// * [`TemporaError::InvalidRange`] when a date is missing or `end` is not
    ///   after `start`.
    /// * [`TemporaError::MissingParameter`] when Custom Days or Fiscal Weeks
    ///   is requested without step sizes.
    /// * [`TemporaError::InvalidParameter`] when step sizes are empty or not
    ///   positive.
    pub fn generate_bins(&self, request: &BinRequest) -> Result<BinSequence> {
        let start = request.start.or(self.start).ok_or_else(|| {
            TemporaError::InvalidRange("a start date is required".to_string())
        })?;
        let end = request
            .end
            .or(self.end)
            .ok_or_else(|| TemporaError::InvalidRange("an end date is required".to_string()))?;
        let periodicity = request.periodicity.unwrap_or(self.periodicity);

        if end <= start {
            return Err(TemporaError::InvalidRange(format!(
                "end date {end} must be after start date {start}"
            )));
        }

        let effective_end = if request.inclusive {
            end.checked_add_days(Days::new(1)).ok_or_else(|| {
                TemporaError::InvalidRange(format!("no day follows {end}"))
            })?
        } else {
            end
        };

        let Some(spec) = periodicity.step() else {
            let last = if request.inclusive {
                end
            } else {
                end.checked_sub_days(Days::new(1)).ok_or_else(|| {
                    TemporaError::InvalidRange(format!("no day precedes {end}"))
                })?
            };
            debug!(%periodicity, %start, end = %last, "Generated single bin");
            return Ok(BinSequence::from_bins(vec![DateBin::new(start, last)?]));
        };

        let pattern = StepPattern::for_spec(&spec, request.step_sizes.as_deref())?;
        let mut boundaries = match periodicity.family() {
            PeriodFamily::Iso => iso::start_dates(
                start,
                effective_end,
                pattern,
                periodicity == Periodicity::IsoAnnual,
            )?,
            PeriodFamily::Calendar | PeriodFamily::Entire => calendar::start_dates(
                start,
                effective_end,
                periodicity,
                spec.unit,
                pattern,
                self.week_start,
            )?,
        };
        boundaries.push(effective_end);

        let bins = BinSequence::from_boundaries(&boundaries)?;
        debug!(
            %periodicity,
            %start,
            end = %effective_end,
            bins = bins.len(),
            "Generated bins"
        );
        Ok(bins)
    }

    /// Re-bins the span covered by `bins` under another periodicity.
    ///
    /// The new bins run from the first bin's start through the last bin's
    /// end. An empty input yields an empty sequence.
    pub fn convert_bins(
        &self,
        bins: &[DateBin],
        periodicity: Periodicity,
        step_sizes: Option<&[i64]>,
    ) -> Result<BinSequence> {
        let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
            return Ok(BinSequence::new());
        };

        let mut request = BinRequest::between(first.start, last.end)
            .with_periodicity(periodicity)
            .with_inclusive(true);
        if let Some(sizes) = step_sizes {
            request = request.with_step_sizes(sizes.to_vec());
        }

        let converted = self.generate_bins(&request)?;
        debug!(
            from = bins.len(),
            to = converted.len(),
            %periodicity,
            "Converted bins"
        );
        Ok(converted)
    }
}

/// Per-call overrides for [`Period::generate_bins`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinRequest {
    /// First day of the span; falls back to the engine default.
    pub start: Option<NaiveDate>,
    /// End of the span; falls back to the engine default.
    pub end: Option<NaiveDate>,
    /// Periodicity; falls back to the engine default.
    pub periodicity: Option<Periodicity>,
    /// Whether `end` itself is covered (default `true`).
    pub inclusive: bool,
    /// Day or week counts for Custom Days and Fiscal Weeks, walked cyclically.
    pub step_sizes: Option<Vec<i64>>,
}

impl Default for BinRequest {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            periodicity: None,
            inclusive: true,
            step_sizes: None,
        }
    }
}

impl BinRequest {
    /// Creates a request that uses every engine default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a request for the span `start..=end`.
    #[must_use]
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new().with_start(start).with_end(end)
    }

    /// Overrides the start date.
    #[must_use]
    pub fn with_start(mut self, start: NaiveDate) -> Self {
        self.start = Some(start);
        self
    }

    /// Overrides the end date.
    #[must_use]
    pub fn with_end(mut self, end: NaiveDate) -> Self {
        self.end = Some(end);
        self
    }

    /// Overrides the periodicity.
    #[must_use]
    pub fn with_periodicity(mut self, periodicity: Periodicity) -> Self {
        self.periodicity = Some(periodicity);
        self
    }

    /// Sets whether the end date is covered.
    #[must_use]
    pub fn with_inclusive(mut self, inclusive: bool) -> Self {
        self.inclusive = inclusive;
        self
    }

    /// Supplies bucket sizes for Custom Days or Fiscal Weeks.
    #[must_use]
    pub fn with_step_sizes(mut self, sizes: impl Into<Vec<i64>>) -> Self {
        self.step_sizes = Some(sizes.into());
        self
    }
}
