//! ISO-8601 week arithmetic
//!
//! Every task is scheduled in a week, identified by a [`WeekKey`] such as `2025-W01`.
//! This module computes week keys, the Monday–Sunday range around a date, and the weeks a month spans.
//!
//! Everything here works on calendar dates ([`NaiveDate`]), never on wall-clock time, so that a week key does not depend on the time zone.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// How many candidate weeks [`weeks_intersecting`] considers. No month spans more than six weeks.
const MAX_WEEKS_IN_MONTH: u32 = 6;

const MONTH_ABBREVIATIONS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// An ISO week identifier, `<ISO year>-W<two-digit week number>`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WeekKey {
    year: i32,
    week: u32,
}

impl WeekKey {
    /// Build a key from its parts. Returns `None` when `week` does not exist in this ISO year
    pub fn new(year: i32, week: u32) -> Option<Self> {
        if week == 0 || week > weeks_in_iso_year(year)? {
            return None;
        }
        Some(Self { year, week })
    }

    pub fn year(&self) -> i32 { self.year }
    pub fn week(&self) -> u32 { self.week }

    /// The Monday–Sunday range this key identifies.
    ///
    /// The first and last weeks chrono can represent are truncated at [`NaiveDate::MIN`] and [`NaiveDate::MAX`]
    pub fn range(&self) -> WeekRange {
        match NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon) {
            Some(monday) => week_range(monday),
            None if self.year > 0 => week_range(NaiveDate::MAX),
            None => week_range(NaiveDate::MIN),
        }
    }
}

impl Display for WeekKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

impl FromStr for WeekKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidWeekKey(s.to_string());

        let (year, week) = s.split_once("-W").ok_or_else(invalid)?;
        if week.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let week: u32 = week.parse().map_err(|_| invalid())?;
        let key = WeekKey::new(year, week).ok_or_else(invalid)?;

        // Only the canonical form is accepted (no sign, no leading zeros in the year)
        if key.to_string() != s {
            return Err(invalid());
        }
        Ok(key)
    }
}

/// Used to support serde
impl Serialize for WeekKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
/// Used to support serde
impl<'de> Deserialize<'de> for WeekKey {
    fn deserialize<D>(deserializer: D) -> Result<WeekKey, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Number of ISO weeks (52 or 53) in an ISO year
fn weeks_in_iso_year(year: i32) -> Option<u32> {
    // December 28th is always in the last week of its ISO year
    let dec_28 = NaiveDate::from_ymd_opt(year, 12, 28)?;
    Some(week_key(dec_28).week)
}

/// Compute the ISO week key of a date.
///
/// The date is moved to the Thursday of its week; that Thursday's year is the ISO year, and its week number
/// counts weeks from the first Thursday of that year.
pub fn week_key(date: NaiveDate) -> WeekKey {
    let day_number = i64::from(date.weekday().number_from_monday());
    match date.checked_add_signed(Duration::days(4 - day_number)) {
        Some(thursday) => WeekKey {
            year: thursday.year(),
            week: thursday.ordinal0() / 7 + 1,
        },
        None => {
            // That Thursday is out of chrono's range
            let iso = date.iso_week();
            WeekKey { year: iso.year(), week: iso.week() }
        },
    }
}


/// A Monday-to-Sunday week
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WeekRange {
    monday: NaiveDate,
    sunday: NaiveDate,
}

impl WeekRange {
    pub fn monday(&self) -> NaiveDate { self.monday }
    pub fn sunday(&self) -> NaiveDate { self.sunday }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.monday <= date && date <= self.sunday
    }

    pub fn key(&self) -> WeekKey {
        week_key(self.monday)
    }

    /// The following week, if chrono can represent it
    pub fn next(&self) -> Option<Self> {
        self.sunday.checked_add_signed(Duration::days(1)).map(week_range)
    }

    /// The previous week, if chrono can represent it
    pub fn previous(&self) -> Option<Self> {
        self.monday.checked_sub_signed(Duration::days(1)).map(week_range)
    }

    /// A short label, e.g. `Dec 30 - Jan 05`
    pub fn label(&self) -> String {
        format!("{} - {}", short_date(self.monday), short_date(self.sunday))
    }
}

fn short_date(date: NaiveDate) -> String {
    format!("{} {:02}", MONTH_ABBREVIATIONS[date.month0() as usize], date.day())
}

/// The Monday and Sunday around `date`.
///
/// Sunday counts as the 7th day of the week, so the returned Monday is never after `date`.
/// Weeks that cross the limits of [`NaiveDate`] are truncated.
pub fn week_range(date: NaiveDate) -> WeekRange {
    let offset = i64::from(date.weekday().num_days_from_monday());
    WeekRange {
        monday: date.checked_sub_signed(Duration::days(offset)).unwrap_or(NaiveDate::MIN),
        sunday: date.checked_add_signed(Duration::days(6 - offset)).unwrap_or(NaiveDate::MAX),
    }
}


/// Iterator over the weeks that intersect a month, see [`weeks_intersecting`]
#[derive(Clone, Debug)]
pub struct WeeksOfMonth {
    year: i32,
    month: u32,
    next_monday: Option<NaiveDate>,
    remaining: u32,
}

impl Iterator for WeeksOfMonth {
    type Item = WeekRange;

    fn next(&mut self) -> Option<WeekRange> {
        while self.remaining > 0 {
            let week = week_range(self.next_monday?);
            self.remaining -= 1;
            self.next_monday = week.next().map(|next| next.monday);

            if self.is_in_month(week.monday) || self.is_in_month(week.sunday) {
                return Some(week);
            }
        }
        None
    }
}

impl WeeksOfMonth {
    fn is_in_month(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// Enumerate the weeks that intersect a month (1 = January).
///
/// This starts from the Monday on or before the first day of the month, and walks at most six weeks, yielding every week
/// whose Monday or Sunday falls into the month.
/// An invalid month yields nothing.
pub fn weeks_intersecting(year: i32, month: u32) -> WeeksOfMonth {
    let first_monday = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|first_day| week_range(first_day).monday);
    if first_monday.is_none() {
        log::warn!("No such month: {}-{}", year, month);
    }

    WeeksOfMonth {
        year,
        month,
        next_monday: first_monday,
        remaining: MAX_WEEKS_IN_MONTH,
    }
}
