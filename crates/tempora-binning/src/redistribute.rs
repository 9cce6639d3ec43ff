//! Moving values between binnings by per-day apportionment.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tempora_core::{
    DateBin, Periodicity, Result, TemporaError, checked, checked_sum, is_contiguous,
};
use tracing::debug;

use crate::period::Period;

/// Values keyed by the bins they were redistributed into.
///
/// Target bins are contiguous, so iteration order is chronological.
pub type Redistribution = BTreeMap<DateBin, Decimal>;

impl Period {
    /// Re-expresses `values`, aligned with `bins`, in bins of `periodicity`.
    ///
    /// Each value is spread evenly over the days of its bin, then the per-day
    /// amounts are summed over the days of each new bin. The total is
    /// preserved up to the rounding of the per-day division.
    ///
    /// # Errors
    ///
    /// * [`TemporaError::LengthMismatch`] when `values` and `bins` differ in
    ///   length.
    /// * [`TemporaError::InvalidRange`] when `bins` leave gaps or overlap.
    /// * [`TemporaError::Arithmetic`] when a target total leaves the decimal
    ///   range.
    /// * Any error from [`Period::convert_bins`].
    pub fn redistribute(
        &self,
        values: &[Decimal],
        bins: &[DateBin],
        periodicity: Periodicity,
        step_sizes: Option<&[i64]>,
    ) -> Result<Redistribution> {
        if values.len() != bins.len() {
            return Err(TemporaError::length_mismatch(
                "values vs bins",
                bins.len(),
                values.len(),
            ));
        }
        if bins.is_empty() {
            return Ok(Redistribution::new());
        }
        if !is_contiguous(bins) || bins.iter().any(|bin| bin.end < bin.start) {
            return Err(TemporaError::InvalidRange(
                "bins must be ordered, non-empty and contiguous".to_string(),
            ));
        }

        // One rate per calendar day of the original span
        let mut daily: Vec<Decimal> = Vec::new();
        for (value, bin) in values.iter().zip(bins) {
            let days = bin.day_count();
            let rate = checked(value.checked_div(Decimal::from(days)), "daily rate")?;
            daily.extend(std::iter::repeat_n(rate, days.unsigned_abs() as usize));
        }

        let targets = self.convert_bins(bins, periodicity, step_sizes)?;

        let mut redistributed = Redistribution::new();
        let mut offset = 0usize;
        for target in targets {
            let days = target.day_count().unsigned_abs() as usize;
            let slice = daily.get(offset..offset + days).ok_or_else(|| {
                TemporaError::InvalidRange(format!(
                    "target bin {target} extends past the original span"
                ))
            })?;
            redistributed.insert(target, checked_sum(slice.iter().copied())?);
            offset += days;
        }

        debug!(
            from = bins.len(),
            to = redistributed.len(),
            %periodicity,
            days = daily.len(),
            "Redistributed values"
        );
        Ok(redistributed)
    }
}
