//! Summary statistics on exact decimals.

use rust_decimal::Decimal;
use tempora_core::{Result, TemporaError, checked, checked_sum};

/// Calculates the arithmetic mean of `values`.
///
/// Fails with [`TemporaError::EmptyInput`] when `values` is empty and with
/// [`TemporaError::Arithmetic`] when the total overflows.
pub fn mean(values: &[Decimal]) -> Result<Decimal> {
    if values.is_empty() {
        return Err(TemporaError::EmptyInput(
            "cannot average an empty list".to_string(),
        ));
    }
    let total = checked_sum(values.iter().copied())?;
    checked(total.checked_div(Decimal::from(values.len())), "mean")
}
