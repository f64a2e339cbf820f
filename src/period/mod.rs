//! Reporting windows: the calendar week, month or year around a reference
//! date, the label shown for it, and stepping to the adjacent window.
//!
//! Everything here works on [`NaiveDate`], a calendar date without time or
//! zone, so a window boundary can never slide across midnight.

pub mod selection;

use std::{fmt, str::FromStr};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use selection::PeriodSelection;

const DATE_FORMAT: &str = "%Y-%m-%d";
const WEEK_LABEL_FORMAT: &str = "%b %-d";
const MONTH_LABEL_FORMAT: &str = "%B %Y";
const YEAR_LABEL_FORMAT: &str = "%Y";

/// Granularity of a reporting window.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Week,
    #[default]
    Month,
    Year,
}

impl PeriodType {
    pub const ALL: [PeriodType; 3] = [PeriodType::Week, PeriodType::Month, PeriodType::Year];

    /// Lowercase identifier used in query strings and stored preferences.
    pub fn as_str(self) -> &'static str {
        match self {
            PeriodType::Week => "week",
            PeriodType::Month => "month",
            PeriodType::Year => "year",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PeriodType::Week => "Week",
            PeriodType::Month => "Month",
            PeriodType::Year => "Year",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown period type `{0}`")]
pub struct ParsePeriodTypeError(String);

impl FromStr for PeriodType {
    type Err = ParsePeriodTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(PeriodType::Week),
            "month" => Ok(PeriodType::Month),
            "year" => Ok(PeriodType::Year),
            _ => Err(ParsePeriodTypeError(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    fn steps(self) -> i32 {
        match self {
            Direction::Prev => -1,
            Direction::Next => 1,
        }
    }
}

/// Closed interval `[start_date, end_date]` scoping report and transaction
/// queries. Serialises as `{"startDate": "YYYY-MM-DD", "endDate": "YYYY-MM-DD"}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    pub fn start_ymd(&self) -> String {
        self.start_date.format(DATE_FORMAT).to_string()
    }

    pub fn end_ymd(&self) -> String {
        self.end_date.format(DATE_FORMAT).to_string()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of calendar days covered, both bounds included.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// `startDate` / `endDate` pairs as the reports API expects them.
    pub fn query_params(&self) -> [(&'static str, String); 2] {
        [("startDate", self.start_ymd()), ("endDate", self.end_ymd())]
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_ymd(), self.end_ymd())
    }
}

/// Calendar boundaries of the period containing `reference`.
///
/// Weeks run Monday through Sunday; a Sunday reference belongs to the week
/// that started six days earlier.
pub fn date_range_for_period(reference: NaiveDate, period: PeriodType) -> DateRange {
    match period {
        PeriodType::Week => {
            let start = week_start(reference);
            DateRange {
                start_date: start,
                end_date: start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX),
            }
        }
        PeriodType::Month => {
            let length = days_in_month(reference.year(), reference.month());
            DateRange {
                start_date: reference.with_day(1).unwrap_or(reference),
                end_date: reference.with_day(length).unwrap_or(reference),
            }
        }
        PeriodType::Year => {
            let length = if is_leap_year(reference.year()) { 366 } else { 365 };
            DateRange {
                start_date: reference.with_ordinal(1).unwrap_or(reference),
                end_date: reference.with_ordinal(length).unwrap_or(reference),
            }
        }
    }
}

/// Human label for the period containing `reference`, using en-US month names.
///
/// `"Jan 12 - Jan 18"`, `"January 2026"` or `"2026"`.
pub fn format_period_label(reference: NaiveDate, period: PeriodType) -> String {
    match period {
        PeriodType::Week => {
            let range = date_range_for_period(reference, PeriodType::Week);
            format!(
                "{} - {}",
                range.start_date.format(WEEK_LABEL_FORMAT),
                range.end_date.format(WEEK_LABEL_FORMAT)
            )
        }
        PeriodType::Month => reference.format(MONTH_LABEL_FORMAT).to_string(),
        PeriodType::Year => reference.format(YEAR_LABEL_FORMAT).to_string(),
    }
}

/// Moves `reference` into the previous or next period.
///
/// Month and year steps keep the day of month when the target month has it
/// and clamp to the target month's last day otherwise (Jan 31 -> Feb 28,
/// Feb 29 -> Feb 28 of a common year).
pub fn navigate_period(reference: NaiveDate, period: PeriodType, direction: Direction) -> NaiveDate {
    navigate_period_by(reference, period, direction.steps())
}

/// Moves `reference` by `steps` periods in a single jump. The day of month
/// is clamped once against the final target, so Jan 31 + 2 months is Mar 31.
/// A target outside chrono's calendar leaves `reference` unchanged.
pub fn navigate_period_by(reference: NaiveDate, period: PeriodType, steps: i32) -> NaiveDate {
    if steps == 0 {
        return reference;
    }
    match period {
        PeriodType::Week => {
            let days = Days::new(u64::from(steps.unsigned_abs()) * 7);
            let target = if steps > 0 {
                reference.checked_add_days(days)
            } else {
                reference.checked_sub_days(days)
            };
            target.unwrap_or(reference)
        }
        PeriodType::Month => shift_month(reference, steps),
        PeriodType::Year => shift_month(reference, steps.saturating_mul(12)),
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if is_leap_year(year) => 29,
        _ => 28,
    }
}

pub fn is_leap_year(year: i32) -> bool {
    (year.rem_euclid(4) == 0 && year.rem_euclid(100) != 0) || year.rem_euclid(400) == 0
}

/// Monday on or before `date`, or the first representable day when that
/// Monday falls before it.
fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = Days::new(u64::from(date.weekday().num_days_from_monday()));
    date.checked_sub_days(offset).unwrap_or(NaiveDate::MIN)
}

fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let Some(index) = (date.year() * 12 + date.month0() as i32).checked_add(months) else {
        return date;
    };
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    // Only fails outside chrono's representable years.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(date)
}
