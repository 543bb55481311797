use chrono::{Datelike, Days, Months, NaiveDate};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid month \"{0}\", expected YYYY-MM (e.g. 2024-01)")]
pub struct InvalidMonth(pub String);

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The month a date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self(date - Days::new(u64::from(date.day0())))
    }

    pub fn current() -> Self {
        Self::of(chrono::Local::now().date_naive())
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::of(date) == *self
    }

    /// Step `months` calendar months forward (or backward when negative).
    pub fn offset(&self, months: i32) -> Option<Self> {
        let shifted = if months >= 0 {
            self.0.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            self.0.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        shifted.map(Self)
    }

    pub fn succ(&self) -> Option<Self> {
        self.offset(1)
    }

    pub fn pred(&self) -> Option<Self> {
        self.offset(-1)
    }

    /// Whole months from `earlier` to `self`; negative when `earlier` is later.
    pub fn months_since(&self, earlier: YearMonth) -> i64 {
        let index = |m: &YearMonth| i64::from(m.0.year()) * 12 + i64::from(m.0.month0());
        index(self) - index(&earlier)
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl FromStr for YearMonth {
    type Err = InvalidMonth;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || InvalidMonth(s.to_string());

        // A full date names its month too.
        if trimmed.len() == 10 {
            return NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(Self::of)
                .map_err(|_| invalid());
        }

        let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}
