use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::MONTHS_PER_YEAR;

/// A calendar month, the resolution of every ledger cell and chart label.
///
/// Ordered chronologically and rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    /// Returns `None` unless `month` is within `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=MONTHS_PER_YEAR)
            .contains(&month)
            .then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn january(year: i32) -> Self {
        Self { year, month: 1 }
    }

    pub fn december(year: i32) -> Self {
        Self { year, month: 12 }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Zero-based index of the month inside its year table.
    pub fn month_index(&self) -> usize {
        (self.month - 1) as usize
    }

    pub fn succ(&self) -> Self {
        if self.month == MONTHS_PER_YEAR {
            Self::january(self.year + 1)
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn pred(&self) -> Self {
        if self.month == 1 {
            Self::december(self.year - 1)
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Number of months from `self` to `other`; negative when `other` is earlier.
    pub fn months_until(&self, other: &YearMonth) -> i64 {
        (other.year as i64 - self.year as i64) * MONTHS_PER_YEAR as i64
            + (other.month as i64 - self.month as i64)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .rsplit_once('-')
            .ok_or_else(|| format!("'{}' is not a YYYY-MM month", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("'{}' has an invalid year", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("'{}' has an invalid month", s))?;
        YearMonth::new(year, month).ok_or_else(|| format!("'{}' has a month outside 1-12", s))
    }
}

impl Serialize for YearMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

pub fn current_year() -> i32 {
    Utc::now().date_naive().year()
}

pub fn current_month() -> YearMonth {
    YearMonth::from_date(Utc::now().date_naive())
}

/// Every month from `start` to `end`, both inclusive.
pub fn get_months_between(start: YearMonth, end: YearMonth) -> Vec<YearMonth> {
    if start > end {
        return Vec::new();
    }
    let mut months = Vec::with_capacity((start.months_until(&end) + 1) as usize);
    let mut current = start;
    while current <= end {
        months.push(current);
        current = current.succ();
    }
    months
}
