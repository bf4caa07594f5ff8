//! Filters shared by the dataset adapters
//!
//! Range bounds are inclusive at both ends. Absent bounds are open.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::source::Record;

// =============================================================================
// Year/month ranges
// =============================================================================

/// A calendar month used as a sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Parse an HKMA quarter label (`"2024-Q3"`) into its quarter-end month
    pub fn from_quarter(label: &str) -> Option<Self> {
        let (year, quarter) = label.trim().split_once("-Q")?;
        let year: i32 = year.parse().ok()?;
        let quarter: u32 = quarter.parse().ok()?;
        if !(1..=4).contains(&quarter) {
            return None;
        }
        Some(Self::new(year, quarter * 3))
    }

    /// Parse a compact `YYYYMM` stamp as used by IRD
    pub fn from_compact(stamp: &str) -> Option<Self> {
        let stamp = stamp.trim();
        if stamp.len() < 6 || !stamp.is_char_boundary(4) {
            return None;
        }
        let year: i32 = stamp[..4].parse().ok()?;
        let month: u32 = stamp[4..].parse().ok()?;
        Some(Self::new(year, month))
    }

    /// `YYYY-MM`
    pub fn to_dashed(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Inclusive year/month window built from optional tool arguments
///
/// A month outside 1..=12 is ignored, which widens that bound to the whole
/// year. A month without a year is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthRange {
    pub start: Option<YearMonth>,
    pub end: Option<YearMonth>,
}

impl MonthRange {
    pub fn new(
        start_year: Option<i32>,
        start_month: Option<u32>,
        end_year: Option<i32>,
        end_month: Option<u32>,
    ) -> Self {
        let valid = |m: Option<u32>| m.filter(|m| (1..=12).contains(m));
        Self {
            start: start_year.map(|y| YearMonth::new(y, valid(start_month).unwrap_or(1))),
            end: end_year.map(|y| YearMonth::new(y, valid(end_month).unwrap_or(12))),
        }
    }

    pub fn contains(&self, ym: YearMonth) -> bool {
        self.start.map_or(true, |s| ym >= s) && self.end.map_or(true, |e| ym <= e)
    }
}

// =============================================================================
// Date ranges
// =============================================================================

/// Parse a `YYYY-MM-DD` tool argument
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        Error::InvalidParameter(format!("Invalid date format: {}. Use YYYY-MM-DD", date_str))
    })
}

/// Parse optional date strings; empty strings count as absent
pub fn parse_date_opt(s: Option<&str>) -> Result<Option<NaiveDate>> {
    match s.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(date_str) => parse_date(date_str).map(Some),
    }
}

/// Inclusive date window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        Ok(Self {
            start: parse_date_opt(start)?,
            end: parse_date_opt(end)?,
        })
    }

    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

// =============================================================================
// Text matching and pagination
// =============================================================================

/// Case-insensitive exact match after trimming both sides
pub fn eq_ignore_case_trimmed(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// An optional text filter; blank filters match everything
pub fn matches_filter(filter: Option<&str>, value: &str) -> bool {
    match filter.map(str::trim).filter(|f| !f.is_empty()) {
        None => true,
        Some(f) => eq_ignore_case_trimmed(f, value),
    }
}

/// District and bank name filters shared by the locator datasets
pub fn matches_location(record: &Record, district: Option<&str>, bank_name: Option<&str>) -> bool {
    matches_filter(district, &str_field(record, "district"))
        && matches_filter(bank_name, &str_field(record, "bank_name"))
}

/// `items[offset..offset + pagesize]`, clamped to the available items
pub fn paginate<T>(items: Vec<T>, offset: usize, pagesize: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(pagesize).collect()
}

// =============================================================================
// Field access on loosely-typed records
// =============================================================================

/// String field, trimmed. Missing and null become `""`; numbers are rendered.
pub fn str_field(record: &Record, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

/// Coordinate field: numbers or numeric strings. Missing and null become 0.0.
pub fn coord_field(record: &Record, key: &str) -> Result<f64> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| Error::InvalidData(format!("{} out of range: {}", key, n))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::InvalidData(format!("Invalid {}: {:?}", key, s))),
        Some(other) => Err(Error::InvalidData(format!("Invalid {}: {}", key, other))),
    }
}
