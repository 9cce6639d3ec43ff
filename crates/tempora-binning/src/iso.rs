//! Period start dates for the ISO week-numbering family.

use chrono::{Datelike, NaiveDate, Weekday};
use tempora_core::{Result, StepPattern, TemporaError};

/// Collects the start date of every ISO period beginning before `end`.
///
/// `breaks` holds the ISO week numbers on which periods begin. The walk starts
/// at the first break point after `start`'s ISO week, so a mid-period `start`
/// becomes a stub. The ISO year advances whenever the pattern wraps, or on
/// every step when `annual` is set. A break point on week 53 in a year that
/// has only 52 weeks is skipped in favor of the following break point in the
/// next ISO year.
pub(crate) fn start_dates(
    start: NaiveDate,
    end: NaiveDate,
    breaks: StepPattern,
    annual: bool,
) -> Result<Vec<NaiveDate>> {
    let start_week = start.iso_week();
    let index = breaks
        .sizes()
        .iter()
        .position(|&week| week > start_week.week())
        .unwrap_or(0);
    let mut breaks = breaks.rotated(index);
    let mut iso_year = start_week.year();

    let mut dates = Vec::new();
    let mut current = start;
    while current < end {
        dates.push(current);

        let week = breaks.advance();
        if current.iso_week().week() > week || annual {
            iso_year += 1;
        }

        current = match NaiveDate::from_isoywd_opt(iso_year, week, Weekday::Mon) {
            Some(date) => date,
            None => {
                let week = breaks.advance();
                iso_year += 1;
                NaiveDate::from_isoywd_opt(iso_year, week, Weekday::Mon).ok_or_else(|| {
                    TemporaError::InvalidRange(format!(
                        "ISO week {week} of {iso_year} is outside the supported date range"
                    ))
                })?
            }
        };
    }

    Ok(dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempora_core::Periodicity;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn breaks(periodicity: Periodicity) -> StepPattern {
        StepPattern::new(periodicity.iso_break_points().unwrap().to_vec()).unwrap()
    }

    #[test]
    fn test_skips_missing_week_53() {
        // 2023 has 52 ISO weeks, so the week after W52 is 2024-W01
        let dates = start_dates(
            date(2023, 12, 18),
            date(2024, 1, 9),
            breaks(Periodicity::IsoWeek),
            false,
        )
        .unwrap();
        assert_eq!(
            dates,
            vec![date(2023, 12, 18), date(2023, 12, 25), date(2024, 1, 1), date(2024, 1, 8)]
        );
    }

    #[test]
    fn test_keeps_existing_week_53() {
        // 2020 has 53 ISO weeks
        let dates = start_dates(
            date(2020, 12, 21),
            date(2021, 1, 5),
            breaks(Periodicity::IsoWeek),
            false,
        )
        .unwrap();
        assert_eq!(dates, vec![date(2020, 12, 21), date(2020, 12, 28), date(2021, 1, 4)]);
    }

    #[test]
    fn test_start_in_previous_iso_year() {
        // 2021-01-01 belongs to 2020-W53
        let dates = start_dates(
            date(2021, 1, 1),
            date(2021, 1, 12),
            breaks(Periodicity::IsoBiweekly),
            false,
        )
        .unwrap();
        assert_eq!(dates, vec![date(2021, 1, 1), date(2021, 1, 4)]);
    }

    #[test]
    fn test_annual_always_advances_year() {
        let dates = start_dates(
            date(2023, 1, 2),
            date(2024, 12, 30),
            breaks(Periodicity::IsoAnnual),
            true,
        )
        .unwrap();
        assert_eq!(dates, vec![date(2023, 1, 2), date(2024, 1, 1)]);
    }
}
