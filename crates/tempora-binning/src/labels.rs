//! Human readable bin labels.

use std::fmt::Write;

use chrono::{Datelike, NaiveDate};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use tempora_core::{DateBin, Periodicity, Result, TemporaError};

use crate::period::Period;

const MONTH_LABELS: [&str; 13] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec", "M13",
];
const QUARTER_LABELS: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];
const HALF_YEAR_LABELS: [&str; 2] = ["HY1", "HY2"];

/// Which end of a bin a custom format string is applied to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelAnchor {
    /// The first day of the bin.
    #[default]
    Start,
    /// The last day of the bin.
    End,
}

impl Period {
    /// Renders one label per bin.
    ///
    /// With a `format` string each label is the strftime rendering of the
    /// bin's start or end date, per `anchor`. Without one the built-in label
    /// for `periodicity` (falling back to the engine default) is used:
    ///
    /// | periodicity                         | label              | date  |
    /// |-------------------------------------|--------------------|-------|
    /// | ISO Week                            | `Week 1-23`        | start |
    /// | ISO Biweekly                        | `Weeks 1-2 23`     | both  |
    /// | ISO Month / Quarter / Semiannual    | `Feb-23`, `Q1-23`  | start |
    /// | ISO Annual                          | `2023`             | start |
    /// | Calendar Month, Monthly             | `Jan-23`           | end   |
    /// | Calendar Quarter, Quarterly         | `03-23Q`           | end   |
    /// | Entire Period                       | `01/01/23-03/31/23`| both  |
    /// | everything else                     | `01/08/23`         | end   |
    ///
    /// ISO month, quarter and half-year names follow the same week break
    /// points used to generate the bins.
    ///
    /// # Errors
    ///
    /// [`TemporaError::InvalidParameter`] when `format` is not a valid
    /// strftime string for a calendar date.
    pub fn render_labels(
        &self,
        bins: &[DateBin],
        periodicity: Option<Periodicity>,
        format: Option<&str>,
        anchor: LabelAnchor,
    ) -> Result<Vec<String>> {
        if bins.is_empty() {
            return Ok(Vec::new());
        }

        if let Some(format) = format.filter(|f| !f.is_empty()) {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(TemporaError::InvalidParameter(format!(
                    "invalid date format string {format:?}"
                )));
            }
            return bins
                .iter()
                .map(|bin| {
                    let date = match anchor {
                        LabelAnchor::Start => bin.start,
                        LabelAnchor::End => bin.end,
                    };
                    strftime(date, format)
                })
                .collect();
        }

        let periodicity = periodicity.unwrap_or(self.periodicity());
        Ok(bins.iter().map(|bin| builtin_label(bin, periodicity)).collect())
    }
}

fn strftime(date: NaiveDate, format: &str) -> Result<String> {
    let mut label = String::new();
    write!(label, "{}", date.format(format)).map_err(|_| {
        TemporaError::InvalidParameter(format!(
            "format string {format:?} needs fields a calendar date does not have"
        ))
    })?;
    Ok(label)
}

fn two_digit_year(year: i32) -> i32 {
    year.rem_euclid(100)
}

fn builtin_label(bin: &DateBin, periodicity: Periodicity) -> String {
    let start_week = bin.start.iso_week();
    match periodicity {
        Periodicity::IsoWeek => {
            format!("Week {}-{:02}", start_week.week(), two_digit_year(start_week.year()))
        }
        Periodicity::IsoBiweekly => {
            let end_week = bin.end.iso_week();
            format!(
                "Weeks {}-{} {:02}",
                start_week.week(),
                end_week.week(),
                two_digit_year(end_week.year())
            )
        }
        Periodicity::IsoAnnual => start_week.year().to_string(),
        Periodicity::IsoMonth4
        | Periodicity::IsoMonth454
        | Periodicity::IsoMonth445
        | Periodicity::IsoQuarter
        | Periodicity::IsoSemiannual => format!(
            "{}-{:02}",
            iso_bucket_label(periodicity, start_week.week()),
            two_digit_year(start_week.year())
        ),
        Periodicity::CalendarMonth | Periodicity::Monthly => bin.end.format("%b-%y").to_string(),
        Periodicity::CalendarQuarter | Periodicity::Quarterly => {
            bin.end.format("%m-%yQ").to_string()
        }
        Periodicity::EntirePeriod => format!(
            "{}-{}",
            bin.start.format("%m/%d/%y"),
            bin.end.format("%m/%d/%y")
        ),
        Periodicity::Weekly
        | Periodicity::Biweekly
        | Periodicity::CalendarYear
        | Periodicity::Annually
        | Periodicity::CustomDays
        | Periodicity::FiscalWeeks => bin.end.format("%m/%d/%y").to_string(),
    }
}

/// Names the ISO month, quarter or half year that `week` falls in.
fn iso_bucket_label(periodicity: Periodicity, week: u32) -> &'static str {
    let breaks = periodicity.iso_break_points().unwrap_or(&[1]);
    let index = breaks
        .iter()
        .filter(|&&start| start <= week)
        .count()
        .saturating_sub(1);
    let names: &[&'static str] = match periodicity {
        Periodicity::IsoQuarter => &QUARTER_LABELS,
        Periodicity::IsoSemiannual => &HALF_YEAR_LABELS,
        _ => &MONTH_LABELS,
    };
    names.get(index).copied().unwrap_or("")
}
