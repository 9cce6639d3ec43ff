//! The chainable forecast engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tempora_core::{Numeric, Result, TemporaError, checked, checked_sum};
use tempora_solvers::{linear_regression, mean, polynomial_fit};
use tracing::{debug, warn};

use crate::seasonality::calculate_seasonality_factors;

/// Allowed drift of weight and seasonality totals from their required sums.
const TOTAL_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 13);

/// Historical cycles and the most recently produced forecast.
///
/// `data` holds one list of values per cycle, oldest cycle first. Each
/// forecasting method validates its arguments, replaces `forecast` and returns
/// the engine, so calls chain. A method that fails leaves `forecast` as it
/// was.
///
/// Unless stated otherwise a method reads the trailing `periods` values of the
/// most recent cycle. When the latest cycle is too short the cycles are
/// concatenated and the trailing values of that view are used instead.
///
/// The horizon `n` defaults to the length of the most recent cycle.
///
/// Besides the errors each method lists, every method reports
/// [`TemporaError::Arithmetic`] when an intermediate value leaves the decimal
/// range.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    data: Vec<Vec<Decimal>>,
    #[serde(default)]
    forecast: Vec<Decimal>,
}

impl Forecast {
    /// Creates an engine over `data`, oldest cycle first.
    #[must_use]
    pub const fn new(data: Vec<Vec<Decimal>>) -> Self {
        Self {
            data,
            forecast: Vec::new(),
        }
    }

    /// Replaces the historical cycles.
    pub fn load(&mut self, data: Vec<Vec<Decimal>>) -> &mut Self {
        self.data = data;
        self
    }

    /// Replaces the historical cycles with host supplied numbers.
    ///
    /// Missing observations become zero. Nothing is replaced when any value
    /// fails to convert.
    ///
    /// # Errors
    ///
    /// [`TemporaError::TypeMismatch`] when any value is a binary float.
    pub fn load_numeric(&mut self, data: Vec<Vec<Numeric>>) -> Result<&mut Self> {
        let data = data
            .into_iter()
            .map(|cycle| cycle.into_iter().map(Numeric::to_decimal).collect())
            .collect::<Result<Vec<Vec<Decimal>>>>()?;
        Ok(self.load(data))
    }

    /// Returns the historical cycles.
    #[must_use]
    pub fn data(&self) -> &[Vec<Decimal>] {
        &self.data
    }

    /// Returns the most recently produced forecast.
    #[must_use]
    pub fn forecast(&self) -> &[Decimal] {
        &self.forecast
    }

    /// Consumes the engine, returning the most recently produced forecast.
    #[must_use]
    pub fn into_forecast(self) -> Vec<Decimal> {
        self.forecast
    }

    /// Grows every value of the latest cycle by `percent` percent.
    ///
    /// The latest cycle is repeated when `n` exceeds its length.
    ///
    /// # Errors
    ///
    /// [`TemporaError::NoData`] when there is no usable latest cycle.
    pub fn percent_over_previous_period(
        &mut self,
        percent: Decimal,
        n: Option<usize>,
    ) -> Result<&mut Self> {
        let latest = self.latest()?;
        let horizon = n.unwrap_or(latest.len());
        let factor = growth_factor(percent)?;

        let forecast = latest
            .iter()
            .cycle()
            .take(horizon)
            .map(|value| checked(value.checked_mul(factor), "percent growth"))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.emit("percent_over_previous_period", forecast))
    }

    /// Like [`Forecast::percent_over_previous_period`], with the percentage
    /// taken from the growth of the last two cycles.
    ///
    /// The percentage compares the sums of the trailing `periods` values
    /// (default: the latest cycle's length) of the latest and previous cycles.
    /// Cycles of different lengths are logged and compared anyway.
    ///
    /// # Errors
    ///
    /// * [`TemporaError::NoData`] when there is no usable latest cycle.
    /// * [`TemporaError::InvalidParameter`] when `periods` is zero.
    /// * [`TemporaError::InsufficientData`] with fewer than two cycles, or
    ///   when either cycle is shorter than `periods`.
    /// * [`TemporaError::Arithmetic`] when the previous cycle sums to zero.
    pub fn calculated_percent_over_previous_period(
        &mut self,
        periods: Option<usize>,
        n: Option<usize>,
    ) -> Result<&mut Self> {
        let latest = self.latest()?;
        let [.., previous, _] = self.data.as_slice() else {
            return Err(TemporaError::InsufficientData {
                requested: 2,
                available: self.data.len(),
            });
        };
        let periods = positive_periods(periods.unwrap_or(latest.len()))?;

        if latest.len() != previous.len() {
            warn!(
                latest = latest.len(),
                previous = previous.len(),
                "Comparing cycles of different lengths"
            );
        }
        let available = latest.len().min(previous.len());
        if periods > available {
            return Err(TemporaError::InsufficientData {
                requested: periods,
                available,
            });
        }

        let latest_total = checked_sum(latest[latest.len() - periods..].iter().copied())?;
        let previous_total = checked_sum(previous[previous.len() - periods..].iter().copied())?;
        if previous_total.is_zero() {
            return Err(TemporaError::Arithmetic("previous cycle sums to zero".to_string()));
        }
        let percent = checked(
            latest_total
                .checked_div(previous_total)
                .and_then(|ratio| ratio.checked_sub(Decimal::ONE))
                .and_then(|growth| growth.checked_mul(Decimal::ONE_HUNDRED)),
            "cycle growth",
        )?;

        debug!(periods, %percent, "Calculated percent over previous period");
        self.percent_over_previous_period(percent, n)
    }

    /// Repeats the latest cycle unchanged.
    ///
    /// # Errors
    ///
    /// [`TemporaError::NoData`] when there is no usable latest cycle.
    pub fn previous_period_to_current_period(&mut self, n: Option<usize>) -> Result<&mut Self> {
        let latest = self.latest()?;
        let horizon = n.unwrap_or(latest.len());

        let forecast = latest.iter().copied().cycle().take(horizon).collect();
        Ok(self.emit("previous_period_to_current_period", forecast))
    }

    /// Forecasts each period as the mean of the `periods` values before it.
    ///
    /// Forecast values join the window as they are produced.
    ///
    /// # Errors
    ///
    /// * [`TemporaError::NoData`] when there is no usable latest cycle.
    /// * [`TemporaError::InvalidParameter`] when `periods` is zero.
    /// * [`TemporaError::InsufficientData`] when all cycles together hold
    ///   fewer than `periods` values.
    pub fn moving_average(&mut self, periods: usize, n: Option<usize>) -> Result<&mut Self> {
        let horizon = self.horizon(n)?;
        let mut series = self.lookback(periods, periods)?;

        for _ in 0..horizon {
            let average = mean(&series[series.len() - periods..])?;
            series.push(average);
        }
        Ok(self.emit("moving_average", series.split_off(periods)))
    }

    /// Extends the line through the last value and the value `periods`
    /// before it.
    ///
    /// # Errors
    ///
    /// * [`TemporaError::NoData`] when there is no usable latest cycle.
    /// * [`TemporaError::InvalidParameter`] when `periods` is zero.
    /// * [`TemporaError::InsufficientData`] when all cycles together hold
    ///   fewer than `periods + 1` values.
    pub fn linear_approximation(&mut self, periods: usize, n: Option<usize>) -> Result<&mut Self> {
        let horizon = self.horizon(n)?;
        let needed = positive_periods(periods)?.saturating_add(1);
        let history = self.lookback(periods, needed)?;

        let last = history[periods];
        let slope = checked(
            last.checked_sub(history[0])
                .and_then(|rise| rise.checked_div(Decimal::from(periods))),
            "slope",
        )?;
        let forecast = (1..=horizon)
            .map(|step| {
                let projected = slope
                    .checked_mul(Decimal::from(step))
                    .and_then(|rise| last.checked_add(rise));
                checked(projected, "linear projection")
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.emit("linear_approximation", forecast))
    }

    /// Fits a least-squares line to the trailing `periods` values and extends
    /// it.
    ///
    /// # Errors
    ///
    /// * [`TemporaError::NoData`] when there is no usable latest cycle.
    /// * [`TemporaError::InvalidParameter`] when `periods` is zero.
    /// * [`TemporaError::InsufficientData`] when all cycles together hold
    ///   fewer than `periods` values.
    /// * [`TemporaError::Arithmetic`] when a single period leaves the slope
    ///   undefined.
    pub fn least_squares_regression(
        &mut self,
        periods: usize,
        n: Option<usize>,
    ) -> Result<&mut Self> {
        let horizon = self.horizon(n)?;
        let history = self.lookback(periods, periods)?;

        let fit = linear_regression(&positions(1, periods), &history)?;
        let forecast = positions(periods + 1, horizon)
            .into_iter()
            .map(|x| fit.predict(x))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.emit("least_squares_regression", forecast))
    }

    /// Fits a quadratic to the trailing `periods` values and extends it.
    ///
    /// # Errors
    ///
    /// * [`TemporaError::NoData`] when there is no usable latest cycle.
    /// * [`TemporaError::InvalidParameter`] when `periods` is zero.
    /// * [`TemporaError::InsufficientData`] when all cycles together hold
    ///   fewer than `periods` values.
    /// * [`TemporaError::Arithmetic`] when fewer than three periods leave the
    ///   quadratic undetermined.
    pub fn second_degree_approximation(
        &mut self,
        periods: usize,
        n: Option<usize>,
    ) -> Result<&mut Self> {
        let horizon = self.horizon(n)?;
        let history = self.lookback(periods, periods)?;

        let coefficients = polynomial_fit(&positions(1, periods), &history, 2)?;
        let forecast = positions(periods + 1, horizon)
            .into_iter()
            .map(|x| {
                coefficients.iter().rev().try_fold(Decimal::ZERO, |acc, coefficient| {
                    let value = acc.checked_mul(x).and_then(|v| v.checked_add(*coefficient));
                    checked(value, "quadratic projection")
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.emit("second_degree_approximation", forecast))
    }

    /// Grows the value `periods` back by `percent` percent.
    ///
    /// Forecast values join the series as they are produced, so horizons
    /// longer than `periods` compound.
    ///
    /// # Errors
    ///
    /// * [`TemporaError::NoData`] when there is no usable latest cycle.
    /// * [`TemporaError::InvalidParameter`] when `periods` is zero.
    /// * [`TemporaError::InsufficientData`] when all cycles together hold
    ///   fewer than `periods` values.
    pub fn flexible_method(
        &mut self,
        percent: Decimal,
        periods: usize,
        n: Option<usize>,
    ) -> Result<&mut Self> {
        let horizon = self.horizon(n)?;
        let mut series = self.lookback(periods, periods)?;
        let factor = growth_factor(percent)?;

        for i in 0..horizon {
            let grown = checked(series[i].checked_mul(factor), "percent growth")?;
            series.push(grown);
        }
        Ok(self.emit("flexible_method", series.split_off(periods)))
    }

    /// Forecasts each period as the weighted sum of the `periods` values
    /// before it.
    ///
    /// `weights` apply oldest first and must sum to 1.
    ///
    /// # Errors
    ///
    /// * [`TemporaError::NoData`] when there is no usable latest cycle.
    /// * [`TemporaError::InvalidParameter`] when `periods` is zero.
    /// * [`TemporaError::LengthMismatch`] when there are not exactly
    ///   `periods` weights.
    /// * [`TemporaError::ValueRange`] when the weights do not sum to 1.
    /// * [`TemporaError::InsufficientData`] when all cycles together hold
    ///   fewer than `periods` values.
    pub fn weighted_moving_average(
        &mut self,
        periods: usize,
        weights: &[Decimal],
        n: Option<usize>,
    ) -> Result<&mut Self> {
        let horizon = self.horizon(n)?;
        positive_periods(periods)?;
        if weights.len() != periods {
            return Err(TemporaError::length_mismatch(
                "weights vs periods",
                periods,
                weights.len(),
            ));
        }
        let total = checked_sum(weights.iter().copied())?;
        if !within_tolerance(total, Decimal::ONE) {
            return Err(TemporaError::ValueRange(format!(
                "weights must sum to 1, got {total}"
            )));
        }

        let history = self.lookback(periods, periods)?;
        let forecast = weighted_forecast(history, weights, horizon)?;
        Ok(self.emit("weighted_moving_average", forecast))
    }

    /// Weighted moving average with weights rising linearly, `k / (1 + ... +
    /// periods)` for the `k`-th oldest value.
    ///
    /// # Errors
    ///
    /// * [`TemporaError::NoData`] when there is no usable latest cycle.
    /// * [`TemporaError::InvalidParameter`] when `periods` is zero.
    /// * [`TemporaError::InsufficientData`] when all cycles together hold
    ///   fewer than `periods` values.
    pub fn linear_smoothing(&mut self, periods: usize, n: Option<usize>) -> Result<&mut Self> {
        let horizon = self.horizon(n)?;
        let history = self.lookback(periods, periods)?;

        let triangle = checked(
            Decimal::from(periods)
                .checked_mul(Decimal::from(periods + 1))
                .and_then(|product| product.checked_div(Decimal::TWO)),
            "weight total",
        )?;
        let weights = positions(1, periods)
            .into_iter()
            .map(|k| checked(k.checked_div(triangle), "weight"))
            .collect::<Result<Vec<_>>>()?;
        let forecast = weighted_forecast(history, &weights, horizon)?;
        Ok(self.emit("linear_smoothing", forecast))
    }

    /// Exponentially smooths the trailing `periods` values and repeats the
    /// final smoothed value.
    ///
    /// # Errors
    ///
    /// * [`TemporaError::NoData`] when there is no usable latest cycle.
    /// * [`TemporaError::ValueRange`] when `alpha` is outside `[0, 1]`.
    /// * [`TemporaError::InvalidParameter`] when `periods` is zero.
    /// * [`TemporaError::InsufficientData`] when all cycles together hold
    ///   fewer than `periods` values.
    pub fn exponential_smoothing(
        &mut self,
        periods: usize,
        alpha: Decimal,
        n: Option<usize>,
    ) -> Result<&mut Self> {
        let horizon = self.horizon(n)?;
        unit_interval("alpha", alpha)?;
        let history = self.lookback(periods, periods)?;

        let (first, rest) = history.split_first().ok_or(TemporaError::NoData)?;
        let smoothed = rest
            .iter()
            .try_fold(*first, |previous, &value| blend(alpha, value, previous))?;
        Ok(self.emit("exponential_smoothing", vec![smoothed; horizon]))
    }

    /// Holt's level and trend smoothing over the de-seasonalized latest cycle,
    /// re-seasonalized on the way out.
    ///
    /// Each value of the latest cycle is divided by its seasonality factor
    /// before smoothing. Forecast period `m` is `(level + trend * m)` times
    /// factor `m`. Factors repeat when the cycle or horizon outruns them. When
    /// `seasonality` is `None` the factors come from
    /// [`calculate_seasonality_factors`] over all cycles.
    ///
    /// # Errors
    ///
    /// * [`TemporaError::NoData`] when there is no usable latest cycle.
    /// * [`TemporaError::ValueRange`] when `alpha` or `beta` is outside
    ///   `[0, 1]`, or supplied factors do not average to 1.
    /// * [`TemporaError::LengthMismatch`] when supplied factors are empty.
    /// * [`TemporaError::Arithmetic`] when a factor used for division is
    ///   zero or a value leaves the decimal range.
    pub fn exponential_smoothing_with_trend_and_seasonality(
        &mut self,
        alpha: Decimal,
        beta: Decimal,
        n: Option<usize>,
        seasonality: Option<&[Decimal]>,
    ) -> Result<&mut Self> {
        let latest = self.latest()?;
        let horizon = n.unwrap_or(latest.len());
        unit_interval("alpha", alpha)?;
        unit_interval("beta", beta)?;

        let factors = match seasonality {
            Some(factors) => {
                check_supplied_factors(factors, latest.len())?;
                factors.to_vec()
            }
            None => calculate_seasonality_factors(&self.data)?,
        };

        let mut level = deseasonalize(latest[0], factors[0])?;
        let mut trend = Decimal::ZERO;
        for (value, &factor) in latest.iter().zip(factors.iter().cycle()).skip(1) {
            let projected = checked(level.checked_add(trend), "level")?;
            let next_level = blend(alpha, deseasonalize(*value, factor)?, projected)?;
            let change = checked(next_level.checked_sub(level), "trend")?;
            trend = blend(beta, change, trend)?;
            level = next_level;
        }

        let forecast = factors
            .iter()
            .cycle()
            .take(horizon)
            .zip(1u64..)
            .map(|(factor, m)| {
                let value = trend
                    .checked_mul(Decimal::from(m))
                    .and_then(|rise| level.checked_add(rise))
                    .and_then(|base| base.checked_mul(*factor));
                checked(value, "seasonal projection")
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(%level, %trend, factors = factors.len(), "Smoothed level and trend");
        Ok(self.emit("exponential_smoothing_with_trend_and_seasonality", forecast))
    }

    /// Returns the most recent cycle, which every method needs.
    fn latest(&self) -> Result<&[Decimal]> {
        match self.data.last() {
            Some(cycle) if !cycle.is_empty() => Ok(cycle),
            _ => Err(TemporaError::NoData),
        }
    }

    fn horizon(&self, n: Option<usize>) -> Result<usize> {
        let latest = self.latest()?;
        Ok(n.unwrap_or(latest.len()))
    }

    /// Returns the trailing `needed` values of history, taken from the latest
    /// cycle when it is long enough and from all cycles otherwise.
    fn lookback(&self, periods: usize, needed: usize) -> Result<Vec<Decimal>> {
        positive_periods(periods)?;
        let latest = self.latest()?;
        if needed <= latest.len() {
            return Ok(latest[latest.len() - needed..].to_vec());
        }

        let flattened: Vec<Decimal> = self.data.iter().flatten().copied().collect();
        if needed > flattened.len() {
            return Err(TemporaError::InsufficientData {
                requested: needed,
                available: flattened.len(),
            });
        }
        debug!(needed, available = flattened.len(), "Looking back across cycles");
        Ok(flattened[flattened.len() - needed..].to_vec())
    }

    fn emit(&mut self, method: &'static str, forecast: Vec<Decimal>) -> &mut Self {
        debug!(method, horizon = forecast.len(), "Produced forecast");
        self.forecast = forecast;
        self
    }
}

fn growth_factor(percent: Decimal) -> Result<Decimal> {
    checked(
        percent
            .checked_div(Decimal::ONE_HUNDRED)
            .and_then(|share| Decimal::ONE.checked_add(share)),
        "growth factor",
    )
}

/// `weight * value + (1 - weight) * previous`, with `weight` in `[0, 1]`.
fn blend(weight: Decimal, value: Decimal, previous: Decimal) -> Result<Decimal> {
    let blended = weight.checked_mul(value).and_then(|new| {
        (Decimal::ONE - weight)
            .checked_mul(previous)
            .and_then(|old| new.checked_add(old))
    });
    checked(blended, "smoothing")
}

fn within_tolerance(total: Decimal, expected: Decimal) -> bool {
    total
        .checked_sub(expected)
        .is_some_and(|drift| drift.abs() <= TOTAL_TOLERANCE)
}

fn positive_periods(periods: usize) -> Result<usize> {
    if periods == 0 {
        return Err(TemporaError::InvalidParameter(
            "periods must be at least 1".to_string(),
        ));
    }
    Ok(periods)
}

fn unit_interval(name: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(TemporaError::ValueRange(format!(
            "{name} must be between 0 and 1, got {value}"
        )));
    }
    Ok(())
}

fn check_supplied_factors(factors: &[Decimal], cycle_len: usize) -> Result<()> {
    if factors.is_empty() {
        return Err(TemporaError::length_mismatch(
            "seasonality factors vs latest cycle",
            cycle_len,
            0,
        ));
    }
    let total = checked_sum(factors.iter().copied())?;
    if !within_tolerance(total, Decimal::from(factors.len())) {
        return Err(TemporaError::ValueRange(format!(
            "seasonality factors must average to 1, got a total of {total} over {}",
            factors.len()
        )));
    }
    Ok(())
}

fn deseasonalize(value: Decimal, factor: Decimal) -> Result<Decimal> {
    value
        .checked_div(factor)
        .ok_or_else(|| TemporaError::Arithmetic(format!("cannot divide {value} by factor {factor}")))
}

/// `count` consecutive x positions starting at `first`.
fn positions(first: usize, count: usize) -> Vec<Decimal> {
    (first..first + count).map(Decimal::from).collect()
}

fn weighted_forecast(
    mut series: Vec<Decimal>,
    weights: &[Decimal],
    horizon: usize,
) -> Result<Vec<Decimal>> {
    let periods = weights.len();
    for i in 0..horizon {
        let terms = weights
            .iter()
            .zip(&series[i..i + periods])
            .map(|(weight, value)| checked(weight.checked_mul(*value), "weighted term"))
            .collect::<Result<Vec<_>>>()?;
        series.push(checked_sum(terms)?);
    }
    Ok(series.split_off(periods))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn engine() -> Forecast {
        let cycles = [
            [128, 117, 115, 125, 122, 137, 140, 129, 131, 114, 119, 137],
            [125, 123, 115, 137, 122, 130, 141, 128, 118, 123, 139, 133],
        ];
        Forecast::new(
            cycles
                .iter()
                .map(|cycle| cycle.iter().copied().map(Decimal::from).collect())
                .collect(),
        )
    }

    fn assert_close(actual: &[Decimal], expected: &[Decimal], tolerance: Decimal) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < tolerance, "{a} is not within {tolerance} of {e}");
        }
    }

    const TIGHT: Decimal = dec!(0.000000000000000001);

    #[test]
    fn test_percent_over_previous_period() {
        let mut engine = engine();
        engine.percent_over_previous_period(dec!(10), None).unwrap();
        assert_eq!(
            engine.forecast(),
            [
                dec!(137.5),
                dec!(135.3),
                dec!(126.5),
                dec!(150.7),
                dec!(134.2),
                dec!(143.0),
                dec!(155.1),
                dec!(140.8),
                dec!(129.8),
                dec!(135.3),
                dec!(152.9),
                dec!(146.3),
            ]
        );

        engine.percent_over_previous_period(dec!(10), Some(14)).unwrap();
        assert_eq!(engine.forecast().len(), 14);
        assert_eq!(engine.forecast()[12..], [dec!(137.5), dec!(135.3)]);

        engine.percent_over_previous_period(Decimal::ZERO, Some(2)).unwrap();
        assert_eq!(engine.forecast(), [dec!(125), dec!(123)]);
    }

    #[test]
    fn test_calculated_percent_over_previous_period() {
        let mut engine = engine();
        engine.calculated_percent_over_previous_period(None, None).unwrap();
        assert_eq!(engine.forecast().len(), 12);
        assert_close(
            &engine.forecast()[..3],
            &[
                dec!(126.6512549537648612945838838),
                dec!(124.6248348745046235138705416),
                dec!(116.5191545574636723910171730),
            ],
            TIGHT,
        );

        // Last two periods: 272 over 256
        engine.calculated_percent_over_previous_period(Some(2), Some(1)).unwrap();
        assert_eq!(engine.forecast(), [dec!(132.8125)]);
    }

    #[test]
    fn test_calculated_percent_needs_two_cycles() {
        let mut single = Forecast::new(vec![vec![dec!(1), dec!(2)]]);
        assert_eq!(
            single
                .calculated_percent_over_previous_period(None, None)
                .map(|_| ()),
            Err(TemporaError::InsufficientData { requested: 2, available: 1 })
        );

        let mut uneven = Forecast::new(vec![vec![dec!(1)], vec![dec!(2), dec!(3)]]);
        assert_eq!(
            uneven
                .calculated_percent_over_previous_period(None, None)
                .map(|_| ()),
            Err(TemporaError::InsufficientData { requested: 2, available: 1 })
        );
        uneven.calculated_percent_over_previous_period(Some(1), None).unwrap();
        assert_eq!(uneven.forecast(), [dec!(6), dec!(9)]);

        let mut zeros = Forecast::new(vec![vec![dec!(0)], vec![dec!(2)]]);
        assert!(matches!(
            zeros.calculated_percent_over_previous_period(None, None),
            Err(TemporaError::Arithmetic(_))
        ));
    }

    #[test]
    fn test_previous_period_to_current_period() {
        let mut engine = engine();
        engine.previous_period_to_current_period(None).unwrap();
        assert_eq!(engine.forecast(), engine.data()[1].as_slice());

        engine.previous_period_to_current_period(Some(13)).unwrap();
        assert_eq!(engine.forecast()[12], dec!(125));
    }

    #[test]
    fn test_moving_average() {
        let mut engine = engine();
        engine.moving_average(3, Some(4)).unwrap();
        assert_close(
            engine.forecast(),
            &[
                dec!(131.6666666666666666666666667),
                dec!(134.5555555555555555555555556),
                dec!(133.0740740740740740740740741),
                dec!(133.0987654320987654320987655),
            ],
            TIGHT,
        );
    }

    #[test]
    fn test_linear_approximation() {
        let mut engine = engine();
        engine.linear_approximation(4, Some(3)).unwrap();
        assert_eq!(engine.forecast(), [dec!(134.25), dec!(135.50), dec!(136.75)]);

        // Twelve periods back needs thirteen values, so both cycles are read
        engine.linear_approximation(12, Some(2)).unwrap();
        assert_close(
            engine.forecast(),
            &[dec!(132.6666666666666666666666667), dec!(132.3333333333333333333333333)],
            TIGHT,
        );

        assert_eq!(
            engine.linear_approximation(24, None).map(|_| ()),
            Err(TemporaError::InsufficientData { requested: 25, available: 24 })
        );
    }

    #[test]
    fn test_least_squares_regression() {
        let mut engine = engine();
        engine.least_squares_regression(12, Some(3)).unwrap();
        assert_close(
            engine.forecast(),
            &[
                dec!(132.8787878787878787878787879),
                dec!(133.6550116550116550116550117),
                dec!(134.4312354312354312354312354),
            ],
            TIGHT,
        );
    }

    #[test]
    fn test_second_degree_approximation() {
        let mut engine = engine();
        engine.second_degree_approximation(12, Some(3)).unwrap();
        assert_close(
            engine.forecast(),
            &[
                Decimal::from(1454) / Decimal::from(11),
                Decimal::from(1459) / Decimal::from(11),
                Decimal::from(133_178) / Decimal::from(1001),
            ],
            dec!(0.000000000000001),
        );
    }

    #[test]
    fn test_flexible_method() {
        let mut engine = engine();
        engine.flexible_method(dec!(10), 3, Some(5)).unwrap();
        assert_eq!(
            engine.forecast(),
            [dec!(135.3), dec!(152.9), dec!(146.3), dec!(148.83), dec!(168.19)]
        );

        engine.flexible_method(dec!(10), 12, Some(14)).unwrap();
        assert_eq!(engine.forecast()[11..], [dec!(146.3), dec!(151.25), dec!(148.83)]);
    }

    #[test]
    fn test_weighted_moving_average() {
        let mut engine = engine();
        engine
            .weighted_moving_average(3, &[dec!(0.2), dec!(0.3), dec!(0.5)], Some(3))
            .unwrap();
        assert_eq!(engine.forecast(), [dec!(132.8), dec!(134.10), dec!(133.490)]);
    }

    #[test]
    fn test_weighted_moving_average_rejects_bad_weights() {
        let mut engine = engine();
        engine.previous_period_to_current_period(Some(1)).unwrap();

        assert!(matches!(
            engine.weighted_moving_average(3, &[dec!(0.5), dec!(0.5)], None),
            Err(TemporaError::LengthMismatch { expected: 3, actual: 2, .. })
        ));
        assert!(matches!(
            engine.weighted_moving_average(3, &[dec!(0.2), dec!(0.3), dec!(0.4)], None),
            Err(TemporaError::ValueRange(_))
        ));
        // Length is checked before the total
        assert!(matches!(
            engine.weighted_moving_average(3, &[dec!(0.2)], None),
            Err(TemporaError::LengthMismatch { .. })
        ));

        // Failed calls leave the previous forecast alone
        assert_eq!(engine.forecast(), [dec!(125)]);
    }

    #[test]
    fn test_linear_smoothing() {
        let mut engine = engine();
        engine.linear_smoothing(3, Some(2)).unwrap();
        assert_close(
            engine.forecast(),
            &[dec!(133.3333333333333333333333333), dec!(134.1666666666666666666666666)],
            TIGHT,
        );
    }

    #[test]
    fn test_exponential_smoothing() {
        let mut engine = engine();
        engine.exponential_smoothing(4, dec!(0.5), Some(2)).unwrap();
        assert_eq!(engine.forecast(), [dec!(131.375), dec!(131.375)]);

        engine.exponential_smoothing(12, dec!(0.3), None).unwrap();
        assert_eq!(engine.forecast().len(), 12);
        assert_close(&engine.forecast()[..1], &[dec!(130.52040413006)], TIGHT);

        assert!(matches!(
            engine.exponential_smoothing(4, dec!(1.5), None),
            Err(TemporaError::ValueRange(_))
        ));
    }

    #[test]
    fn test_exponential_smoothing_with_trend_and_seasonality() {
        let mut engine = engine();
        engine
            .exponential_smoothing_with_trend_and_seasonality(dec!(0.3), dec!(0.4), Some(3), None)
            .unwrap();
        assert_close(
            engine.forecast(),
            &[
                dec!(128.8400382301657645750649972),
                dec!(122.6708414308079671275408113),
                dec!(117.9918052604130601080304970),
            ],
            dec!(0.00000000000000001),
        );
    }

    #[test]
    fn test_supplied_seasonality() {
        let mut engine = Forecast::new(vec![vec![dec!(10), dec!(20), dec!(10), dec!(20)]]);
        let factors = [dec!(0.5), dec!(1.5)];

        // Beta 0 keeps the trend at zero and alpha 1 tracks the last value
        engine
            .exponential_smoothing_with_trend_and_seasonality(
                Decimal::ONE,
                Decimal::ZERO,
                Some(3),
                Some(&factors),
            )
            .unwrap();
        assert_close(
            engine.forecast(),
            &[dec!(6.666666666666666666666666667), dec!(20), dec!(6.666666666666666666666666667)],
            TIGHT,
        );

        assert!(matches!(
            engine.exponential_smoothing_with_trend_and_seasonality(
                dec!(0.5),
                dec!(0.5),
                None,
                Some(&[]),
            ),
            Err(TemporaError::LengthMismatch { actual: 0, .. })
        ));
        assert!(matches!(
            engine.exponential_smoothing_with_trend_and_seasonality(
                dec!(0.5),
                dec!(0.5),
                None,
                Some(&[dec!(0.5), dec!(0.6)]),
            ),
            Err(TemporaError::ValueRange(_))
        ));
        assert!(matches!(
            engine.exponential_smoothing_with_trend_and_seasonality(
                dec!(0.5),
                dec!(-0.1),
                None,
                None,
            ),
            Err(TemporaError::ValueRange(_))
        ));
    }

    #[test]
    fn test_seasonality_wraps_over_longer_latest_cycle() {
        // Factors come from the two-period cycle: totals 3 and 9 give 0.5 and 1.5
        let mut engine = Forecast::new(vec![
            vec![dec!(1), dec!(3)],
            vec![dec!(2), dec!(6), dec!(2), dec!(6)],
        ]);
        engine
            .exponential_smoothing_with_trend_and_seasonality(
                Decimal::ONE,
                Decimal::ZERO,
                Some(3),
                None,
            )
            .unwrap();

        // Periods 3 and 4 reuse factors 0.5 and 1.5, so every level is 4
        assert_eq!(engine.forecast(), [dec!(2), dec!(6), dec!(2)]);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let half = Decimal::MAX / Decimal::TWO;

        let mut engine = Forecast::new(vec![vec![half; 3]]);
        assert!(matches!(
            engine.moving_average(3, Some(1)),
            Err(TemporaError::Arithmetic(_))
        ));
        assert!(engine.forecast().is_empty());

        let mut engine = Forecast::new(vec![vec![Decimal::MAX, Decimal::MAX]]);
        assert!(matches!(
            engine.percent_over_previous_period(dec!(10), None),
            Err(TemporaError::Arithmetic(_))
        ));
        assert!(matches!(
            engine.flexible_method(dec!(10), 1, Some(1)),
            Err(TemporaError::Arithmetic(_))
        ));
        assert!(matches!(
            engine.weighted_moving_average(2, &[dec!(2), dec!(-1)], Some(1)),
            Err(TemporaError::Arithmetic(_))
        ));
        assert!(matches!(
            engine.exponential_smoothing_with_trend_and_seasonality(
                dec!(0.5),
                dec!(0.5),
                Some(1),
                Some(&[dec!(0.5), dec!(1.5)]),
            ),
            Err(TemporaError::Arithmetic(_))
        ));
        assert!(engine.forecast().is_empty());
    }

    #[test]
    fn test_no_data() {
        let mut empty = Forecast::default();
        assert_eq!(empty.moving_average(3, None).map(|_| ()), Err(TemporaError::NoData));
        assert_eq!(
            empty.percent_over_previous_period(dec!(5), None).map(|_| ()),
            Err(TemporaError::NoData)
        );

        let mut hollow = Forecast::new(vec![vec![dec!(1)], vec![]]);
        assert_eq!(
            hollow.previous_period_to_current_period(None).map(|_| ()),
            Err(TemporaError::NoData)
        );
    }

    #[test]
    fn test_lookback_limits() {
        let mut engine = engine();
        assert!(matches!(
            engine.moving_average(0, None),
            Err(TemporaError::InvalidParameter(_))
        ));
        assert_eq!(
            engine.moving_average(25, None).map(|_| ()),
            Err(TemporaError::InsufficientData { requested: 25, available: 24 })
        );

        // Fifteen periods span both cycles
        engine.moving_average(15, Some(1)).unwrap();
        let expected = (dec!(114) + dec!(119) + dec!(137) + dec!(1534)) / dec!(15);
        assert_close(engine.forecast(), &[expected], TIGHT);
    }

    #[test]
    fn test_load_numeric() {
        let mut engine = Forecast::default();
        engine
            .load_numeric(vec![vec![Numeric::from(2), Numeric::Missing, dec!(1.5).into()]])
            .unwrap();
        assert_eq!(engine.data(), [vec![dec!(2), dec!(0), dec!(1.5)]]);

        assert!(matches!(
            engine.load_numeric(vec![vec![Numeric::from(0.1)]]),
            Err(TemporaError::TypeMismatch(_))
        ));
        assert_eq!(engine.data()[0].len(), 3);
    }

    #[test]
    fn test_chaining() {
        let forecast = engine()
            .previous_period_to_current_period(Some(2))
            .unwrap()
            .linear_approximation(4, Some(1))
            .unwrap()
            .forecast()
            .to_vec();
        assert_eq!(forecast, [dec!(134.25)]);
    }

    #[test]
    fn test_deserialize_without_forecast() {
        let engine: Forecast = serde_json::from_str(r#"{"data": [["1.5", "2"]]}"#).unwrap();
        assert_eq!(engine.data(), [vec![dec!(1.5), dec!(2)]]);
        assert!(engine.forecast().is_empty());
    }
}
