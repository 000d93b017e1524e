use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::date_util::{current_year_month, month_label};
use crate::error::{Error, Result};

static RE_MONTH_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{1,2})$").unwrap());

/// The calendar month a period record belongs to.
///
/// Ordering is chronological (year first, then month). Serialized as
/// `"YYYY-MM"`, the identifier entered on the data-entry forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u8,
}

impl MonthKey {
    pub fn new(year: i32, month: u8) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::PeriodParse(format!(
                "month out of range: {year}-{month:02}"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn january(year: i32) -> Self {
        Self { year, month: 1 }
    }

    /// The current local month.
    pub fn current() -> Self {
        let (year, month) = current_year_month();
        Self { year, month }
    }

    /// Parse `YYYY-MM` (a single-digit month is accepted).
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let caps = RE_MONTH_KEY
            .captures(s)
            .ok_or_else(|| Error::PeriodParse(format!("expected YYYY-MM, got: {s}")))?;
        let year: i32 = parse_number(&caps[1], s)?;
        let month: u8 = parse_number(&caps[2], s)?;
        Self::new(year, month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    /// Short month name for chart axes (`Jan`..`Dec`).
    pub fn label(&self) -> &'static str {
        month_label(self.month)
    }

    pub fn to_key(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }

    /// Move forward (positive) or back (negative) by whole months.
    pub fn shift(&self, months: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + months;
        Self {
            year: index.div_euclid(12),
            month: (index.rem_euclid(12) + 1) as u8,
        }
    }

    pub fn previous(&self) -> Self {
        self.shift(-1)
    }

    pub fn next(&self) -> Self {
        self.shift(1)
    }
}

/// Parse a captured digit group, reporting the whole input on failure.
pub(crate) fn parse_number<T: FromStr>(digits: &str, input: &str) -> Result<T> {
    digits
        .parse()
        .map_err(|_| Error::PeriodParse(format!("invalid number in: {input}")))
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_key())
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_key()
    }
}
