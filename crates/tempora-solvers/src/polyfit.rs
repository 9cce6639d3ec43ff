//! Least-squares polynomial fitting through the normal equations.

use rust_decimal::Decimal;
use tempora_core::{Result, TemporaError, checked, checked_sum};
use tracing::debug;

/// Fits a polynomial of `degree` to the points `(x, y)` by least squares.
///
/// Returns the coefficients ordered from the constant term up, so the fitted
/// value at `t` is `sum(coefficients[k] * t^k)`. The normal equations are
/// solved by Gaussian elimination with partial pivoting, entirely in
/// [`Decimal`].
///
/// # Errors
///
/// * [`TemporaError::EmptyInput`] when either input is empty.
/// * [`TemporaError::LengthMismatch`] when `x` and `y` differ in length.
/// * [`TemporaError::Arithmetic`] when the system is singular or an
///   intermediate leaves the decimal range.
pub fn polynomial_fit(x: &[Decimal], y: &[Decimal], degree: usize) -> Result<Vec<Decimal>> {
    if x.is_empty() || y.is_empty() {
        return Err(TemporaError::EmptyInput(
            "polynomial fit inputs must not be empty".to_string(),
        ));
    }
    if x.len() != y.len() {
        return Err(TemporaError::length_mismatch("polynomial fit x vs y", x.len(), y.len()));
    }

    let size = degree + 1;
    let power_sums = power_sums(x, 2 * degree)?;
    let moment_sums = power_sums_weighted(x, y, degree)?;

    // Augmented matrix [A | b] with A[i][j] = sum(x^(i+j)) and b[i] = sum(x^i * y)
    let mut matrix: Vec<Vec<Decimal>> = (0..size)
        .map(|row| {
            let mut line: Vec<Decimal> = (0..size).map(|col| power_sums[row + col]).collect();
            line.push(moment_sums[row]);
            line
        })
        .collect();

    eliminate(&mut matrix)?;
    let coefficients = back_substitute(&matrix)?;

    debug!(degree, points = x.len(), "Fitted polynomial");
    Ok(coefficients)
}

/// Returns `sum(x^k)` for `k` in `0..=max_power`.
fn power_sums(x: &[Decimal], max_power: usize) -> Result<Vec<Decimal>> {
    let mut sums = vec![Decimal::ZERO; max_power + 1];
    for &xi in x {
        let mut power = Decimal::ONE;
        for (k, sum) in sums.iter_mut().enumerate() {
            if k > 0 {
                power = checked(power.checked_mul(xi), "power sum")?;
            }
            *sum = checked(sum.checked_add(power), "power sum")?;
        }
    }
    Ok(sums)
}

/// Returns `sum(x^k * y)` for `k` in `0..=max_power`.
fn power_sums_weighted(x: &[Decimal], y: &[Decimal], max_power: usize) -> Result<Vec<Decimal>> {
    let mut sums = vec![Decimal::ZERO; max_power + 1];
    for (&xi, &yi) in x.iter().zip(y) {
        let mut power = Decimal::ONE;
        for (k, sum) in sums.iter_mut().enumerate() {
            if k > 0 {
                power = checked(power.checked_mul(xi), "power sum")?;
            }
            let term = checked(power.checked_mul(yi), "power sum")?;
            *sum = checked(sum.checked_add(term), "power sum")?;
        }
    }
    Ok(sums)
}

/// Reduces the augmented matrix to upper triangular form in place.
fn eliminate(matrix: &mut [Vec<Decimal>]) -> Result<()> {
    let size = matrix.len();
    for col in 0..size {
        let pivot_row = (col..size)
            .max_by_key(|&row| matrix[row][col].abs())
            .unwrap_or(col);
        if matrix[pivot_row][col].is_zero() {
            return Err(TemporaError::Arithmetic(
                "normal equations are singular".to_string(),
            ));
        }
        matrix.swap(col, pivot_row);

        for row in (col + 1)..size {
            let factor = checked(matrix[row][col].checked_div(matrix[col][col]), "row factor")?;
            if factor.is_zero() {
                continue;
            }
            for k in col..=size {
                let reduced = factor
                    .checked_mul(matrix[col][k])
                    .and_then(|delta| matrix[row][k].checked_sub(delta));
                matrix[row][k] = checked(reduced, "row reduction")?;
            }
        }
    }
    Ok(())
}

fn back_substitute(matrix: &[Vec<Decimal>]) -> Result<Vec<Decimal>> {
    let size = matrix.len();
    let mut solution = vec![Decimal::ZERO; size];
    for row in (0..size).rev() {
        let known = checked_sum(
            ((row + 1)..size)
                .map(|col| checked(matrix[row][col].checked_mul(solution[col]), "substitution"))
                .collect::<Result<Vec<_>>>()?,
        )?;
        let pivot = matrix[row][row];
        if pivot.is_zero() {
            return Err(TemporaError::Arithmetic(
                "normal equations are singular".to_string(),
            ));
        }
        let remainder = checked(matrix[row][size].checked_sub(known), "substitution")?;
        solution[row] = checked(remainder.checked_div(pivot), "substitution")?;
    }
    Ok(solution)
}
