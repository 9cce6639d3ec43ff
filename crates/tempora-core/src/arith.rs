//! Checked decimal arithmetic.
//!
//! `Decimal` operators panic when a result leaves the representable range.
//! These helpers turn that case into [`TemporaError::Arithmetic`].

use rust_decimal::Decimal;

use crate::error::{Result, TemporaError};

/// Unwraps the result of a `checked_*` operation, naming `operation` in the
/// error.
///
/// ```rust
/// use tempora_core::{Decimal, arith::checked};
///
/// assert!(checked(Decimal::MAX.checked_add(Decimal::ONE), "total").is_err());
/// ```
pub fn checked(value: Option<Decimal>, operation: &str) -> Result<Decimal> {
    value.ok_or_else(|| {
        TemporaError::Arithmetic(format!("{operation} is outside the decimal range"))
    })
}

/// Sums `values`, failing instead of overflowing.
pub fn checked_sum<I>(values: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |total, value| checked(total.checked_add(value), "sum"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_checked_sum() {
        assert_eq!(checked_sum([dec!(1.5), dec!(2), dec!(-0.5)]), Ok(dec!(3)));
        assert_eq!(checked_sum([]), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_checked_sum_overflow() {
        let half = Decimal::MAX / Decimal::TWO;
        assert!(matches!(
            checked_sum([half, half, half]),
            Err(TemporaError::Arithmetic(_))
        ));
        assert_eq!(checked_sum([half, -half, half]), Ok(half));
    }

    #[test]
    fn test_checked() {
        assert_eq!(checked(Some(dec!(2)), "product"), Ok(dec!(2)));
        assert!(matches!(
            checked(Decimal::ONE.checked_div(Decimal::ZERO), "quotient"),
            Err(TemporaError::Arithmetic(_))
        ));
    }
}
