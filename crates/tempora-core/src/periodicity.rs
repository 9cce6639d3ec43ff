//! Periodicity and step pattern definitions.
//!
//! This module defines [`Periodicity`], the named rule set for cutting a date
//! span into bins, the fixed [`StepSpec`] each periodicity maps to, and
//! [`StepPattern`], the cyclic sequence of step sizes walked during bin
//! generation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::{Result, TemporaError};

/// ISO week break points for one bin per week.
const ISO_WEEK_BREAKS: [u32; 53] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26,
    27, 28, 29, 30, 31, 32, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, 44, 45, 46, 47, 48, 49, 50,
    51, 52, 53,
];
const ISO_BIWEEKLY_BREAKS: [u32; 27] = [
    1, 3, 5, 7, 9, 11, 13, 15, 17, 19, 21, 23, 25, 27, 29, 31, 33, 35, 37, 39, 41, 43, 45, 47, 49,
    51, 53,
];
const ISO_MONTH_4_BREAKS: [u32; 13] = [1, 5, 9, 13, 17, 21, 25, 29, 33, 37, 41, 45, 49];
const ISO_MONTH_454_BREAKS: [u32; 12] = [1, 5, 10, 14, 18, 23, 27, 31, 36, 40, 44, 49];
const ISO_MONTH_445_BREAKS: [u32; 12] = [1, 5, 9, 14, 18, 22, 27, 31, 35, 40, 44, 48];
const ISO_QUARTER_BREAKS: [u32; 4] = [1, 14, 27, 40];
const ISO_SEMIANNUAL_BREAKS: [u32; 2] = [1, 27];
const ISO_ANNUAL_BREAKS: [u32; 1] = [1];

/// Which rule family drives a periodicity's boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodFamily {
    /// Boundaries fall on ISO week numbers within the ISO week-year.
    Iso,
    /// Boundaries follow Gregorian calendar fields or fixed day/week counts.
    Calendar,
    /// A single bin covering the whole span.
    Entire,
}

/// Named rule for partitioning a date span into bins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Periodicity {
    /// Weekly bins starting on a Monday.
    #[default]
    #[serde(rename = "ISO Week")]
    IsoWeek,
    /// Bins of two ISO weeks.
    #[serde(rename = "ISO Biweekly")]
    IsoBiweekly,
    /// Thirteen months per ISO year of four weeks each.
    #[serde(rename = "ISO Month (4 Weeks)")]
    IsoMonth4,
    /// ISO months of 4, 5 and 4 weeks, repeating.
    #[serde(rename = "ISO Month (4 + 5 + 4)")]
    IsoMonth454,
    /// ISO months of 4, 4 and 5 weeks, repeating.
    #[serde(rename = "ISO Month (4 + 4 + 5)")]
    IsoMonth445,
    /// Quarters of 13 ISO weeks.
    #[serde(rename = "ISO Quarter (13 Weeks)")]
    IsoQuarter,
    /// Half years of 26 ISO weeks.
    #[serde(rename = "ISO Semiannual (26 Weeks)")]
    IsoSemiannual,
    /// Whole ISO years.
    #[serde(rename = "ISO Annual")]
    IsoAnnual,
    /// Weekly bins from the start date (or a configured week start).
    #[serde(rename = "Weekly")]
    Weekly,
    /// Two-week bins from the start date (or a configured week start).
    #[serde(rename = "Biweekly")]
    Biweekly,
    /// Calendar months; a mid-month start produces a stub.
    #[serde(rename = "Calendar Month")]
    CalendarMonth,
    /// Month-long bins anchored on the start date.
    #[serde(rename = "Monthly")]
    Monthly,
    /// Calendar quarters; a start inside a quarter produces a stub.
    #[serde(rename = "Calendar Quarter")]
    CalendarQuarter,
    /// Three-month bins anchored on the start date.
    #[serde(rename = "Quarterly")]
    Quarterly,
    /// January-to-December years; a start after January 1 produces a stub.
    #[serde(rename = "Calendar Year")]
    CalendarYear,
    /// Year-long bins on the anniversaries of the start date.
    #[serde(rename = "Annually")]
    Annually,
    /// Bins of a caller-supplied number (or cycle) of days.
    #[serde(rename = "Custom Days")]
    CustomDays,
    /// Bins of a caller-supplied number (or cycle) of weeks.
    #[serde(rename = "Fiscal Weeks")]
    FiscalWeeks,
    /// One bin for the whole span.
    #[serde(rename = "Entire Period")]
    EntirePeriod,
}

impl Periodicity {
    /// Every periodicity, ISO family first.
    pub const ALL: [Self; 19] = [
        Self::IsoWeek,
        Self::IsoBiweekly,
        Self::IsoMonth4,
        Self::IsoMonth454,
        Self::IsoMonth445,
        Self::IsoQuarter,
        Self::IsoSemiannual,
        Self::IsoAnnual,
        Self::Weekly,
        Self::Biweekly,
        Self::CalendarMonth,
        Self::Monthly,
        Self::CalendarQuarter,
        Self::Quarterly,
        Self::CalendarYear,
        Self::Annually,
        Self::CustomDays,
        Self::FiscalWeeks,
        Self::EntirePeriod,
    ];

    /// Returns the canonical display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::IsoWeek => "ISO Week",
            Self::IsoBiweekly => "ISO Biweekly",
            Self::IsoMonth4 => "ISO Month (4 Weeks)",
            Self::IsoMonth454 => "ISO Month (4 + 5 + 4)",
            Self::IsoMonth445 => "ISO Month (4 + 4 + 5)",
            Self::IsoQuarter => "ISO Quarter (13 Weeks)",
            Self::IsoSemiannual => "ISO Semiannual (26 Weeks)",
            Self::IsoAnnual => "ISO Annual",
            Self::Weekly => "Weekly",
            Self::Biweekly => "Biweekly",
            Self::CalendarMonth => "Calendar Month",
            Self::Monthly => "Monthly",
            Self::CalendarQuarter => "Calendar Quarter",
            Self::Quarterly => "Quarterly",
            Self::CalendarYear => "Calendar Year",
            Self::Annually => "Annually",
            Self::CustomDays => "Custom Days",
            Self::FiscalWeeks => "Fiscal Weeks",
            Self::EntirePeriod => "Entire Period",
        }
    }

    /// Parses a periodicity name, falling back to [`Periodicity::IsoWeek`]
    /// when the name is not recognized.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            warn!(name, "Unknown periodicity, falling back to ISO Week");
            Self::default()
        })
    }

    /// Returns the rule family this periodicity belongs to.
    #[must_use]
    pub const fn family(&self) -> PeriodFamily {
        match self {
            Self::IsoWeek
            | Self::IsoBiweekly
            | Self::IsoMonth4
            | Self::IsoMonth454
            | Self::IsoMonth445
            | Self::IsoQuarter
            | Self::IsoSemiannual
            | Self::IsoAnnual => PeriodFamily::Iso,
            Self::EntirePeriod => PeriodFamily::Entire,
            _ => PeriodFamily::Calendar,
        }
    }

    /// Returns true for periodicities in the ISO family.
    #[must_use]
    pub const fn is_iso(&self) -> bool {
        matches!(self.family(), PeriodFamily::Iso)
    }

    /// Returns true if bin sizes must be supplied by the caller.
    #[must_use]
    pub const fn requires_step_sizes(&self) -> bool {
        matches!(self, Self::CustomDays | Self::FiscalWeeks)
    }

    /// Returns the fixed step specification, or `None` for
    /// [`Periodicity::EntirePeriod`].
    #[must_use]
    pub const fn step(&self) -> Option<StepSpec> {
        let spec = match self {
            Self::IsoWeek => StepSpec::iso(&ISO_WEEK_BREAKS),
            Self::IsoBiweekly => StepSpec::iso(&ISO_BIWEEKLY_BREAKS),
            Self::IsoMonth4 => StepSpec::iso(&ISO_MONTH_4_BREAKS),
            Self::IsoMonth454 => StepSpec::iso(&ISO_MONTH_454_BREAKS),
            Self::IsoMonth445 => StepSpec::iso(&ISO_MONTH_445_BREAKS),
            Self::IsoQuarter => StepSpec::iso(&ISO_QUARTER_BREAKS),
            Self::IsoSemiannual => StepSpec::iso(&ISO_SEMIANNUAL_BREAKS),
            Self::IsoAnnual => StepSpec::iso(&ISO_ANNUAL_BREAKS),
            Self::Weekly => StepSpec::fixed(StepUnit::Week, 1),
            Self::Biweekly => StepSpec::fixed(StepUnit::Week, 2),
            Self::CalendarMonth | Self::Monthly => StepSpec::fixed(StepUnit::Month, 1),
            Self::CalendarQuarter | Self::Quarterly => StepSpec::fixed(StepUnit::Month, 3),
            Self::CalendarYear | Self::Annually => StepSpec::fixed(StepUnit::Year, 1),
            Self::CustomDays => StepSpec {
                unit: StepUnit::Day,
                magnitude: StepMagnitude::Supplied,
            },
            Self::FiscalWeeks => StepSpec {
                unit: StepUnit::Week,
                magnitude: StepMagnitude::Supplied,
            },
            Self::EntirePeriod => return None,
        };
        Some(spec)
    }

    /// Returns the ISO week numbers on which bins start, for ISO periodicities.
    #[must_use]
    pub const fn iso_break_points(&self) -> Option<&'static [u32]> {
        match self.step() {
            Some(StepSpec {
                unit: StepUnit::IsoWeek,
                magnitude: StepMagnitude::Pattern(breaks),
            }) => Some(breaks),
            _ => None,
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Periodicity {
    type Err = TemporaError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TemporaError::UnknownPeriodicity(s.to_string()))
    }
}

/// The date part a step advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepUnit {
    /// Jump to the Monday of an ISO week number.
    IsoWeek,
    /// Calendar days.
    Day,
    /// Seven-day weeks.
    Week,
    /// Calendar months.
    Month,
    /// Calendar years.
    Year,
}

/// How far each step advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepMagnitude {
    /// The same count every step.
    Fixed(u32),
    /// A fixed cyclic sequence (ISO break points).
    Pattern(&'static [u32]),
    /// Counts supplied by the caller at generation time.
    Supplied,
}

/// Unit plus magnitude describing how a periodicity steps through time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StepSpec {
    /// The date part being advanced.
    pub unit: StepUnit,
    /// The amount of each advance.
    pub magnitude: StepMagnitude,
}

impl StepSpec {
    const fn iso(breaks: &'static [u32]) -> Self {
        Self {
            unit: StepUnit::IsoWeek,
            magnitude: StepMagnitude::Pattern(breaks),
        }
    }

    const fn fixed(unit: StepUnit, count: u32) -> Self {
        Self {
            unit,
            magnitude: StepMagnitude::Fixed(count),
        }
    }
}

/// A cyclic sequence of step sizes walked by index modulo its length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepPattern {
    sizes: Vec<u32>,
    position: usize,
}

impl StepPattern {
    /// Creates a pattern; an empty or zero-containing list is rejected.
    pub fn new(sizes: Vec<u32>) -> Result<Self> {
        if sizes.is_empty() {
            return Err(TemporaError::InvalidParameter(
                "step pattern must contain at least one size".to_string(),
            ));
        }
        if sizes.contains(&0) {
            return Err(TemporaError::InvalidParameter(
                "step sizes must be integers greater than 0".to_string(),
            ));
        }
        Ok(Self { sizes, position: 0 })
    }

    /// Validates caller-supplied sizes, which must all be positive.
    pub fn from_supplied(sizes: &[i64]) -> Result<Self> {
        let sizes = sizes
            .iter()
            .map(|&size| {
                u32::try_from(size).ok().filter(|&s| s > 0).ok_or_else(|| {
                    TemporaError::InvalidParameter(format!(
                        "step size {size} must be an integer greater than 0"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(sizes)
    }

    /// Builds the pattern for a [`StepSpec`], using `supplied` when the
    /// periodicity takes its sizes from the caller.
    pub fn for_spec(spec: &StepSpec, supplied: Option<&[i64]>) -> Result<Self> {
        match spec.magnitude {
            StepMagnitude::Fixed(count) => Self::new(vec![count]),
            StepMagnitude::Pattern(sizes) => Self::new(sizes.to_vec()),
            StepMagnitude::Supplied => match supplied {
                Some(sizes) => Self::from_supplied(sizes),
                None => Err(TemporaError::MissingParameter(
                    "this periodicity requires step sizes".to_string(),
                )),
            },
        }
    }

    /// Returns the pattern starting at `index`, wrapping the head to the end.
    #[must_use]
    pub fn rotated(mut self, index: usize) -> Self {
        let len = self.sizes.len();
        self.sizes.rotate_left(index % len);
        self.position = 0;
        self
    }

    /// Returns the current size and moves to the next one.
    pub fn advance(&mut self) -> u32 {
        let size = self.sizes[self.position % self.sizes.len()];
        self.position += 1;
        size
    }

    /// Returns the number of sizes in one cycle.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Returns true when the pattern has no sizes.
    ///
    /// [`StepPattern::new`] rejects an empty size list, so every built
    /// pattern holds at least one size and this is false.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Returns the sizes of one cycle in walking order.
    #[must_use]
    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    /// Returns the number of steps taken so far.
    #[must_use]
    pub const fn steps_taken(&self) -> usize {
        self.position
    }
}
