//! Least-squares linear regression on exact decimals.

use rust_decimal::{Decimal, MathematicalOps};
use tempora_core::{Result, TemporaError, checked};

use crate::stats::mean;

/// Outcome of [`linear_regression`].
///
/// Only `slope` and `intercept` feed the forecasting methods. `p_value` is
/// not computed (it is 1 for two points with equal `y`, otherwise 0).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinearRegression {
    /// Slope of the fitted line.
    pub slope: Decimal,
    /// Intercept of the fitted line.
    pub intercept: Decimal,
    /// Pearson correlation coefficient, clamped to [-1, 1].
    pub r_value: Decimal,
    /// Two-sided p-value placeholder.
    pub p_value: Decimal,
    /// Standard error of the slope; zero for two points.
    pub stderr: Decimal,
}

impl LinearRegression {
    /// Evaluates the fitted line at `x`.
    ///
    /// # Errors
    ///
    /// [`TemporaError::Arithmetic`] when the result is outside the decimal
    /// range.
    pub fn predict(&self, x: Decimal) -> Result<Decimal> {
        let rise = checked(self.slope.checked_mul(x), "regression prediction")?;
        checked(rise.checked_add(self.intercept), "regression prediction")
    }
}

/// Fits `y = slope * x + intercept` by least squares.
///
/// Slope is `cov(x, y) / var(x)` and intercept is `mean(y) - slope * mean(x)`.
///
/// # Errors
///
/// * [`TemporaError::EmptyInput`] when either input is empty.
/// * [`TemporaError::LengthMismatch`] when `x` and `y` differ in length.
/// * [`TemporaError::Arithmetic`] when `x` has zero variance or an
///   intermediate leaves the decimal range.
pub fn linear_regression(x: &[Decimal], y: &[Decimal]) -> Result<LinearRegression> {
    if x.is_empty() || y.is_empty() {
        return Err(TemporaError::EmptyInput(
            "regression inputs must not be empty".to_string(),
        ));
    }
    if x.len() != y.len() {
        return Err(TemporaError::length_mismatch("regression x vs y", x.len(), y.len()));
    }

    let x_mean = mean(x)?;
    let y_mean = mean(y)?;

    // Averaged sums of squared differences from the mean
    let ssxm = co_moment(x, x_mean, x, x_mean)?;
    let ssym = co_moment(y, y_mean, y, y_mean)?;
    let ssxym = co_moment(x, x_mean, y, y_mean)?;

    if ssxm.is_zero() {
        return Err(TemporaError::Arithmetic(
            "x values have zero variance; slope is undefined".to_string(),
        ));
    }

    let r_value = if ssym.is_zero() {
        Decimal::ZERO
    } else {
        let product = checked(ssxm.checked_mul(ssym), "variance product")?;
        let root = product.sqrt().ok_or_else(|| {
            TemporaError::Arithmetic("square root of a negative variance product".to_string())
        })?;
        checked(ssxym.checked_div(root), "correlation")?
            .clamp(Decimal::NEGATIVE_ONE, Decimal::ONE)
    };

    let slope = checked(ssxym.checked_div(ssxm), "slope")?;
    let intercept = checked(
        slope
            .checked_mul(x_mean)
            .and_then(|rise| y_mean.checked_sub(rise)),
        "intercept",
    )?;

    let (p_value, stderr) = if x.len() == 2 {
        let p = if y[0] == y[1] { Decimal::ONE } else { Decimal::ZERO };
        (p, Decimal::ZERO)
    } else {
        let df = Decimal::from(x.len() - 2);
        let unexplained = Decimal::ONE - r_value * r_value;
        let variance = checked(
            unexplained
                .checked_mul(ssym)
                .and_then(|v| v.checked_div(ssxm))
                .and_then(|v| v.checked_div(df)),
            "slope variance",
        )?;
        let stderr = variance.sqrt().ok_or_else(|| {
            TemporaError::Arithmetic("negative residual variance".to_string())
        })?;
        (Decimal::ZERO, stderr)
    };

    Ok(LinearRegression {
        slope,
        intercept,
        r_value,
        p_value,
        stderr,
    })
}

/// Mean of `(a - a_mean) * (b - b_mean)`.
fn co_moment(a: &[Decimal], a_mean: Decimal, b: &[Decimal], b_mean: Decimal) -> Result<Decimal> {
    let products = a
        .iter()
        .zip(b)
        .map(|(ai, bi)| {
            let da = ai.checked_sub(a_mean);
            let db = bi.checked_sub(b_mean);
            checked(da.zip(db).and_then(|(da, db)| da.checked_mul(db)), "deviation product")
        })
        .collect::<Result<Vec<_>>>()?;
    mean(&products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn xs(n: i64) -> Vec<Decimal> {
        (1..=n).map(Decimal::from).collect()
    }

    #[test]
    fn test_exact_line() {
        let x = xs(5);
        let y: Vec<Decimal> = x.iter().map(|v| dec!(2.5) * v + dec!(3)).collect();
        let fit = linear_regression(&x, &y).unwrap();
        assert_eq!(fit.slope, dec!(2.5));
        assert_eq!(fit.intercept, dec!(3));
        assert!((fit.r_value - Decimal::ONE).abs() < dec!(0.000000000001));
        assert!(fit.stderr < dec!(0.000000000001));
        assert_eq!(fit.predict(dec!(10)), Ok(dec!(28)));
    }

    #[test]
    fn test_fits_monthly_series() {
        let y = [125, 123, 115, 137, 122, 130, 141, 128, 118, 123, 139, 133].map(Decimal::from);
        let fit = linear_regression(&xs(12), &y).unwrap();

        let tolerance = dec!(0.0000000000000000001);
        assert!((fit.slope - dec!(0.7762237762237762237762237762)).abs() < tolerance);
        assert!((fit.intercept - dec!(122.787878787878787878787879)).abs() < tolerance);
        assert!(fit.r_value > Decimal::ZERO && fit.r_value < Decimal::ONE);
        assert!(fit.stderr > Decimal::ZERO);
    }

    #[test]
    fn test_two_points() {
        let fit = linear_regression(&[dec!(1), dec!(2)], &[dec!(4), dec!(4)]).unwrap();
        assert_eq!(fit.slope, Decimal::ZERO);
        assert_eq!(fit.p_value, Decimal::ONE);
        assert_eq!(fit.r_value, Decimal::ZERO);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            linear_regression(&[], &[]),
            Err(TemporaError::EmptyInput(_))
        ));
        assert!(matches!(
            linear_regression(&xs(3), &xs(2)),
            Err(TemporaError::LengthMismatch { expected: 3, actual: 2, .. })
        ));
        assert!(matches!(
            linear_regression(&[dec!(1), dec!(1)], &[dec!(1), dec!(2)]),
            Err(TemporaError::Arithmetic(_))
        ));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let half = Decimal::MAX / Decimal::TWO;
        assert!(matches!(
            linear_regression(&xs(3), &[half, Decimal::ZERO, half]),
            Err(TemporaError::Arithmetic(_))
        ));

        // Squared deviations of huge x values leave the decimal range
        let far = Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 0);
        let wide = [-far, Decimal::ZERO, far];
        assert!(matches!(
            linear_regression(&wide, &xs(3)),
            Err(TemporaError::Arithmetic(_))
        ));

        let fit = linear_regression(&xs(3), &[dec!(2), dec!(4), dec!(6)]).unwrap();
        assert!(matches!(fit.predict(Decimal::MAX), Err(TemporaError::Arithmetic(_))));
    }
}
