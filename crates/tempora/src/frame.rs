//! Polars export for binned series.

use polars::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use tempora_core::{Result, TemporaError};

use crate::series::BinnedSeries;

/// Builds a `DataFrame` with one row per bin.
///
/// Columns are `start` and `end` (ISO dates as strings), `label` and `value`.
/// Values are converted to `f64` for display; the series itself stays exact.
///
/// # Errors
///
/// * [`TemporaError::LengthMismatch`] when `labels` does not have one entry
///   per bin.
/// * [`TemporaError::Arithmetic`] when a value has no `f64` representation.
pub fn to_dataframe(series: &BinnedSeries, labels: &[String]) -> Result<DataFrame> {
    if labels.len() != series.len() {
        return Err(TemporaError::length_mismatch(
            "labels vs bins",
            series.len(),
            labels.len(),
        ));
    }

    let starts: Vec<String> = series.bins().iter().map(|bin| bin.start.to_string()).collect();
    let ends: Vec<String> = series.bins().iter().map(|bin| bin.end.to_string()).collect();
    let values: Vec<f64> = series
        .values()
        .iter()
        .map(|value| {
            value.to_f64().ok_or_else(|| {
                TemporaError::Arithmetic(format!("{value} has no f64 representation"))
            })
        })
        .collect::<Result<_>>()?;

    DataFrame::new(vec![
        Column::new("start".into(), starts),
        Column::new("end".into(), ends),
        Column::new("label".into(), labels.to_vec()),
        Column::new("value".into(), values),
    ])
    .map_err(|e| TemporaError::InvalidParameter(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempora_binning::{BinRequest, LabelAnchor, Period};
    use tempora_core::Periodicity;

    #[test]
    fn test_monthly_frame() {
        let period = Period::new();
        let bins = period
            .generate_bins(
                &BinRequest::between(
                    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2023, 2, 28).unwrap(),
                )
                .with_periodicity(Periodicity::CalendarMonth),
            )
            .unwrap();
        let labels = period
            .render_labels(
                bins.as_slice(),
                Some(Periodicity::CalendarMonth),
                None,
                LabelAnchor::Start,
            )
            .unwrap();
        let series = BinnedSeries::new(bins, vec![dec!(1.5), dec!(2)]).unwrap();

        let df = to_dataframe(&series, &labels).unwrap();
        assert_eq!(df.shape(), (2, 4));
        let names: Vec<&str> = df.get_column_names().iter().map(|name| name.as_str()).collect();
        assert_eq!(names, ["start", "end", "label", "value"]);

        let ends = df.column("end").unwrap().str().unwrap();
        assert_eq!(ends.get(1), Some("2023-02-28"));
        let values = df.column("value").unwrap().f64().unwrap();
        assert_eq!(values.get(0), Some(1.5));

        assert!(matches!(
            to_dataframe(&series, &labels[..1]),
            Err(TemporaError::LengthMismatch { .. })
        ));
    }
}
