//! Period start dates for the Gregorian calendar family.
//!
//! Aligned periodicities (Calendar Month, Calendar Quarter, Calendar Year)
//! emit a stub from `start` to the next natural boundary when `start` is not
//! already on one. Weekly and Biweekly do the same against a configured week
//! start. Everything else steps straight from `start`.
//!
//! Steps are measured from a fixed anchor (`anchor + k months`), so month-end
//! anchors land on the last day of shorter months without drifting.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use tempora_core::{Periodicity, Result, StepPattern, StepUnit, TemporaError};

/// Collects the start date of every calendar period beginning before `end`.
pub(crate) fn start_dates(
    start: NaiveDate,
    end: NaiveDate,
    periodicity: Periodicity,
    unit: StepUnit,
    mut pattern: StepPattern,
    week_start: Option<Weekday>,
) -> Result<Vec<NaiveDate>> {
    let mut dates = Vec::new();

    let aligned = match periodicity {
        Periodicity::Weekly | Periodicity::Biweekly => match week_start {
            Some(weekday) if start.weekday() != weekday => {
                let back = (i64::from(start.weekday().num_days_from_monday())
                    - i64::from(weekday.num_days_from_monday()))
                .rem_euclid(7);
                let period_start = sub_days(start, back.unsigned_abs())?;
                Some(offset(period_start, StepUnit::Week, pattern.advance())?)
            }
            _ => None,
        },
        Periodicity::CalendarMonth if start.day() != 1 => {
            Some(offset(month_start(start)?, unit, pattern.advance())?)
        }
        Periodicity::CalendarQuarter => {
            let first_of_quarter = quarter_start(start)?;
            if first_of_quarter == start {
                None
            } else {
                Some(offset(first_of_quarter, unit, pattern.advance())?)
            }
        }
        Periodicity::CalendarYear if start.ordinal() != 1 => {
            let year_start = NaiveDate::from_ymd_opt(start.year(), 1, 1).ok_or_else(|| {
                TemporaError::InvalidRange(format!("no January 1 in year {}", start.year()))
            })?;
            Some(offset(year_start, unit, pattern.advance())?)
        }
        _ => None,
    };

    // A stub runs from `start` to the day before the first aligned boundary
    let anchor = match aligned {
        Some(boundary) => {
            dates.push(start);
            boundary
        }
        None => start,
    };

    let mut current = anchor;
    let mut travelled: u32 = 0;
    while current < end {
        dates.push(current);
        travelled = travelled.checked_add(pattern.advance()).ok_or_else(|| {
            TemporaError::InvalidRange("period steps overflow the date range".to_string())
        })?;
        current = offset(anchor, unit, travelled)?;
    }

    Ok(dates)
}

/// Moves `count` units forward from `anchor`, clamping to month ends.
fn offset(anchor: NaiveDate, unit: StepUnit, count: u32) -> Result<NaiveDate> {
    let moved = match unit {
        StepUnit::Day => anchor.checked_add_days(Days::new(u64::from(count))),
        StepUnit::Week => anchor.checked_add_days(Days::new(u64::from(count) * 7)),
        StepUnit::Month => anchor.checked_add_months(Months::new(count)),
        StepUnit::Year => count
            .checked_mul(12)
            .and_then(|months| anchor.checked_add_months(Months::new(months))),
        StepUnit::IsoWeek => {
            return Err(TemporaError::InvalidParameter(
                "ISO week steps are not calendar steps".to_string(),
            ));
        }
    };
    moved.ok_or_else(|| {
        TemporaError::InvalidRange(format!("{count} {unit:?} steps from {anchor} overflow"))
    })
}

fn sub_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_sub_days(Days::new(days))
        .ok_or_else(|| TemporaError::InvalidRange(format!("{days} days before {date} overflow")))
}

fn month_start(date: NaiveDate) -> Result<NaiveDate> {
    date.with_day(1)
        .ok_or_else(|| TemporaError::InvalidRange(format!("no first of month for {date}")))
}

/// Returns the first day of the calendar quarter containing `date`.
fn quarter_start(date: NaiveDate) -> Result<NaiveDate> {
    let month = (date.month0() / 3) * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), month, 1)
        .ok_or_else(|| TemporaError::InvalidRange(format!("no quarter start for {date}")))
}
