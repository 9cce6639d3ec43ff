//! Values attached to a bin sequence.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tempora_binning::Period;
use tempora_core::{BinSequence, Periodicity, Result, TemporaError, checked_sum};
use tracing::debug;

/// A bin sequence with one value per bin.
///
/// This is the unit that flows from the period engine into the forecast
/// engine: generate bins, attach values, redistribute to the reporting
/// periodicity, then split into cycles for forecasting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinnedSeries {
    bins: BinSequence,
    values: Vec<Decimal>,
}

impl BinnedSeries {
    /// Pairs `values` with `bins`.
    ///
    /// # Errors
    ///
    /// [`TemporaError::LengthMismatch`] when there is not exactly one value
    /// per bin.
    pub fn new(bins: BinSequence, values: Vec<Decimal>) -> Result<Self> {
        if bins.len() != values.len() {
            return Err(TemporaError::length_mismatch(
                "values vs bins",
                bins.len(),
                values.len(),
            ));
        }
        Ok(Self { bins, values })
    }

    /// Returns the bins.
    #[must_use]
    pub const fn bins(&self) -> &BinSequence {
        &self.bins
    }

    /// Returns the values, aligned with [`BinnedSeries::bins`].
    #[must_use]
    pub fn values(&self) -> &[Decimal] {
        &self.values
    }

    /// Returns the number of bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Returns true when the series has no bins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Sum of all values.
    ///
    /// # Errors
    ///
    /// [`TemporaError::Arithmetic`] when the sum leaves the decimal range.
    pub fn total(&self) -> Result<Decimal> {
        checked_sum(self.values.iter().copied())
    }

    /// Re-expresses the series in bins of `periodicity` over the same span.
    ///
    /// See [`Period::redistribute`].
    ///
    /// # Errors
    ///
    /// Any error from [`Period::redistribute`].
    pub fn redistribute(
        &self,
        period: &Period,
        periodicity: Periodicity,
        step_sizes: Option<&[i64]>,
    ) -> Result<Self> {
        let redistributed =
            period.redistribute(&self.values, self.bins.as_slice(), periodicity, step_sizes)?;
        let (bins, values): (Vec<_>, Vec<_>) = redistributed.into_iter().unzip();
        Ok(Self {
            bins: BinSequence::from_bins(bins),
            values,
        })
    }

    /// Splits the values into consecutive cycles of `cycle_len`, oldest
    /// first.
    ///
    /// A trailing partial cycle is kept as the most recent cycle.
    ///
    /// # Errors
    ///
    /// [`TemporaError::InvalidParameter`] when `cycle_len` is zero.
    pub fn into_cycles(self, cycle_len: usize) -> Result<Vec<Vec<Decimal>>> {
        if cycle_len == 0 {
            return Err(TemporaError::InvalidParameter(
                "cycle length must be at least 1".to_string(),
            ));
        }
        let cycles: Vec<Vec<Decimal>> =
            self.values.chunks(cycle_len).map(<[Decimal]>::to_vec).collect();
        debug!(cycles = cycles.len(), cycle_len, "Split series into cycles");
        Ok(cycles)
    }

    /// Loads the series into a forecast engine, split into cycles of
    /// `cycle_len`.
    ///
    /// # Errors
    ///
    /// [`TemporaError::InvalidParameter`] when `cycle_len` is zero.
    #[cfg(feature = "forecast")]
    pub fn into_forecast(self, cycle_len: usize) -> Result<tempora_forecast::Forecast> {
        Ok(tempora_forecast::Forecast::new(self.into_cycles(cycle_len)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempora_binning::BinRequest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn monthly(months: u32, values: Vec<Decimal>) -> BinnedSeries {
        let end = NaiveDate::from_ymd_opt(2023, months + 1, 1)
            .unwrap_or(date(2024, 1, 1))
            .pred_opt()
            .unwrap();
        let bins = Period::new()
            .generate_bins(
                &BinRequest::between(date(2023, 1, 1), end)
                    .with_periodicity(Periodicity::CalendarMonth),
            )
            .unwrap();
        BinnedSeries::new(bins, values).unwrap()
    }

    #[test]
    fn test_new_checks_lengths() {
        let series = monthly(3, vec![dec!(1550), dec!(2100), dec!(3100)]);
        assert_eq!(series.len(), 3);
        assert_eq!(series.total(), Ok(dec!(6750)));

        let huge = BinnedSeries::new(series.bins().clone(), vec![Decimal::MAX; 3]).unwrap();
        assert!(matches!(huge.total(), Err(TemporaError::Arithmetic(_))));

        assert!(matches!(
            BinnedSeries::new(series.bins().clone(), vec![dec!(1)]),
            Err(TemporaError::LengthMismatch { expected: 3, actual: 1, .. })
        ));
    }

    #[test]
    fn test_redistribute_to_quarter() {
        let series = monthly(3, vec![dec!(1550), dec!(2100), dec!(3100)]);
        let quarter = series
            .redistribute(&Period::new(), Periodicity::CalendarQuarter, None)
            .unwrap();

        assert_eq!(quarter.values(), [dec!(6750)]);
        assert_eq!(quarter.bins().span(), Some((date(2023, 1, 1), date(2023, 3, 31))));
    }

    #[test]
    fn test_into_cycles_keeps_partial_tail() {
        let values: Vec<Decimal> = (1..=5).map(Decimal::from).collect();
        let series = monthly(5, values);

        let cycles = series.clone().into_cycles(2).unwrap();
        assert_eq!(cycles, vec![vec![dec!(1), dec!(2)], vec![dec!(3), dec!(4)], vec![dec!(5)]]);

        assert!(matches!(series.into_cycles(0), Err(TemporaError::InvalidParameter(_))));
    }

    #[cfg(feature = "forecast")]
    #[test]
    fn test_into_forecast() {
        let values: Vec<Decimal> = (1..=12).map(Decimal::from).collect();
        let mut engine = monthly(12, values).into_forecast(6).unwrap();

        engine.linear_approximation(5, Some(2)).unwrap();
        assert_eq!(engine.forecast(), [dec!(13), dec!(14)]);
    }
}
