//! Seasonality factors derived from historical cycles.

use rust_decimal::Decimal;
use tempora_core::{Result, TemporaError, checked, checked_sum};
use tracing::debug;

/// Computes one seasonality factor per period of a cycle.
///
/// Only the first `k` periods of each cycle are used, where `k` is the length
/// of the shortest cycle. The factor for period `i` is that period's total
/// across all cycles divided by the grand total, scaled by `k`, so the factors
/// average to 1.
///
/// # Errors
///
/// * [`TemporaError::NoData`] when `data` is empty or any cycle is empty.
/// * [`TemporaError::Arithmetic`] when the grand total is zero or a total
///   leaves the decimal range.
pub fn calculate_seasonality_factors(data: &[Vec<Decimal>]) -> Result<Vec<Decimal>> {
    let period_count = data.iter().map(Vec::len).min().unwrap_or(0);
    if period_count == 0 {
        return Err(TemporaError::NoData);
    }

    let period_totals = (0..period_count)
        .map(|i| checked_sum(data.iter().map(|cycle| cycle[i])))
        .collect::<Result<Vec<_>>>()?;
    let grand_total = checked_sum(period_totals.iter().copied())?;
    if grand_total.is_zero() {
        return Err(TemporaError::Arithmetic(
            "seasonality needs a non-zero total across all cycles".to_string(),
        ));
    }

    let scale = Decimal::from(period_count);
    let factors = period_totals
        .into_iter()
        .map(|total| {
            let share = total
                .checked_div(grand_total)
                .and_then(|share| share.checked_mul(scale));
            checked(share, "seasonality factor")
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(cycles = data.len(), period_count, %grand_total, "Calculated seasonality factors");
    Ok(factors)
}
