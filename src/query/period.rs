use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::query::month::{parse_number, MonthKey};

static RE_HALF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-H([12])$").unwrap());
static RE_QUARTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-Q([1-4])$").unwrap());
static RE_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})$").unwrap());
static RE_TRAILING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{1,3})[mM]$").unwrap());

fn is_year(s: &str) -> bool {
    s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit())
}

/// A window of months selecting which period records feed an aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Period {
    Year(i32),
    Half(i32, u8),
    Quarter(i32, u8),
    Month(i32, u8),
    /// The last N months ending at (and including) the given month.
    Trailing(u32, MonthKey),
    YearToDate(i32),
}

impl Period {
    /// Parse a period string.
    ///
    /// Supported formats:
    /// - `2025`: year
    /// - `2025-H1`: half
    /// - `2025-Q1`: quarter
    /// - `2025-01`: month
    /// - `6m`: trailing N months ending with the current month
    /// - `ytd`: year to date (current year)
    /// - `2024-ytd`: a specific year to date
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let current = MonthKey::current();

        if s.eq_ignore_ascii_case("ytd") {
            return Ok(Period::YearToDate(current.year()));
        }

        if let Some(caps) = RE_TRAILING.captures(s) {
            let n: u32 = parse_number(&caps[1], s)?;
            if n == 0 {
                return Err(Error::PeriodParse(format!("empty trailing window: {s}")));
            }
            return Ok(Period::Trailing(n, current));
        }

        if let Some(rest) = s.strip_suffix("-ytd") {
            if !is_year(rest) {
                return Err(Error::PeriodParse(format!("invalid year: {s}")));
            }
            return Ok(Period::YearToDate(parse_number(rest, s)?));
        }

        if is_year(s) {
            return Ok(Period::Year(parse_number(s, s)?));
        }

        if let Some(caps) = RE_HALF.captures(s) {
            let year: i32 = parse_number(&caps[1], s)?;
            let half: u8 = parse_number(&caps[2], s)?;
            return Ok(Period::Half(year, half));
        }

        if let Some(caps) = RE_QUARTER.captures(s) {
            let year: i32 = parse_number(&caps[1], s)?;
            let q: u8 = parse_number(&caps[2], s)?;
            return Ok(Period::Quarter(year, q));
        }

        if let Some(caps) = RE_MONTH.captures(s) {
            let year: i32 = parse_number(&caps[1], s)?;
            let month: u8 = parse_number(&caps[2], s)?;
            if (1..=12).contains(&month) {
                return Ok(Period::Month(year, month));
            }
        }

        Err(Error::PeriodParse(format!("unrecognized period: {s}")))
    }

    /// Convert to a canonical key string.
    pub fn to_key(&self) -> String {
        match self {
            Period::Year(y) => format!("{y}"),
            Period::Half(y, h) => format!("{y}-H{h}"),
            Period::Quarter(y, q) => format!("{y}-Q{q}"),
            Period::Month(y, m) => format!("{y}-{m:02}"),
            Period::Trailing(n, _) => format!("{n}m"),
            Period::YearToDate(y) => format!("{y}-ytd"),
        }
    }

    /// Inclusive (first, last) month bounds of this window.
    pub fn month_range(&self) -> (MonthKey, MonthKey) {
        match self {
            Period::Year(y) => (month(*y, 1), month(*y, 12)),
            Period::Half(y, h) => {
                let start = (*h as i32 - 1) * 6 + 1;
                (month(*y, start), month(*y, start + 5))
            }
            Period::Quarter(y, q) => {
                let start = (*q as i32 - 1) * 3 + 1;
                (month(*y, start), month(*y, start + 2))
            }
            Period::Month(y, m) => (month(*y, *m as i32), month(*y, *m as i32)),
            Period::Trailing(n, as_of) => (as_of.shift(-(*n as i32 - 1)), *as_of),
            // January through the current calendar month, in year `y`, so
            // last year's YTD lines up with this year's.
            Period::YearToDate(y) => {
                let through = MonthKey::current().month() as i32;
                (month(*y, 1), month(*y, through))
            }
        }
    }

    /// Whether a record's month falls inside this window.
    pub fn contains(&self, key: MonthKey) -> bool {
        let (start, end) = self.month_range();
        key >= start && key <= end
    }

    /// Get the previous period of the same type.
    pub fn previous(&self) -> Self {
        match self {
            Period::Year(y) => Period::Year(y - 1),
            Period::Half(y, h) => {
                if *h == 1 {
                    Period::Half(y - 1, 2)
                } else {
                    Period::Half(*y, 1)
                }
            }
            Period::Quarter(y, q) => {
                if *q == 1 {
                    Period::Quarter(y - 1, 4)
                } else {
                    Period::Quarter(*y, q - 1)
                }
            }
            Period::Month(y, m) => {
                if *m == 1 {
                    Period::Month(y - 1, 12)
                } else {
                    Period::Month(*y, m - 1)
                }
            }
            Period::Trailing(n, as_of) => Period::Trailing(*n, as_of.shift(-(*n as i32))),
            Period::YearToDate(y) => Period::YearToDate(y - 1),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_key())
    }
}

fn month(year: i32, month: i32) -> MonthKey {
    MonthKey::january(year).shift(month - 1)
}
