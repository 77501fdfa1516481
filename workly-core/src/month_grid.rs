//! Month grid generation for calendar views.
//!
//! A month is laid out as whole weeks of seven days. The first row is padded
//! with the trailing days of the previous month and the last row with the
//! leading days of the next month.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::error::{WorklyError, WorklyResult};

/// A calendar month, e.g. 2025-03.
///
/// Only months whose neighbours are also representable dates can be built,
/// so the padded grid of any `YearMonth` stays within chrono's date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

fn following(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn preceding(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn first_of(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> WorklyResult<Self> {
        if first_of(year, month).is_none() {
            return Err(WorklyError::Validation(format!(
                "Invalid month {:04}-{:02}",
                year, month
            )));
        }

        let (prev_year, prev_month) = preceding(year, month);
        let (next_year, next_month) = following(year, month);
        let neighbours_exist =
            first_of(prev_year, prev_month).is_some() && first_of(next_year, next_month).is_some();
        if !neighbours_exist {
            return Err(WorklyError::Validation(format!(
                "Month {:04}-{:02} is outside the supported date range",
                year, month
            )));
        }

        Ok(YearMonth { year, month })
    }

    /// The month containing `date`. Fails only for the first and last
    /// months of chrono's range.
    pub fn from_date(date: NaiveDate) -> WorklyResult<Self> {
        YearMonth::new(date.year(), date.month())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        first_of(self.year, self.month).expect("validated on construction")
    }

    pub fn last_day(&self) -> NaiveDate {
        let (year, month) = following(self.year, self.month);
        first_of(year, month)
            .and_then(|d| d.pred_opt())
            .expect("next month validated on construction")
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// The following month, or `None` at the end of the supported range.
    pub fn next(&self) -> Option<Self> {
        let (year, month) = following(self.year, self.month);
        YearMonth::new(year, month).ok()
    }

    /// The preceding month, or `None` at the start of the supported range.
    pub fn previous(&self) -> Option<Self> {
        let (year, month) = preceding(self.year, self.month);
        YearMonth::new(year, month).ok()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Human-readable name, e.g. "March 2025".
    pub fn name(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = WorklyError;

    /// Parse `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || WorklyError::Validation(format!("Invalid month '{}'. Expected YYYY-MM", s));

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        YearMonth::new(year, month).map_err(|_| invalid())
    }
}

/// Number of days to step back from `date` to reach `first_weekday`.
fn days_since(date: NaiveDate, first_weekday: Weekday) -> u64 {
    let current = date.weekday().num_days_from_monday();
    let first = first_weekday.num_days_from_monday();
    ((7 + current - first) % 7) as u64
}

/// Ordered dates filling a 7-column grid for `month`, starting on
/// `first_weekday`.
pub fn month_grid(month: YearMonth, first_weekday: Weekday) -> Vec<NaiveDate> {
    let first = month.first_day();
    let last = month.last_day();

    let start = first - Days::new(days_since(first, first_weekday));
    let end = last + Days::new(6 - days_since(last, first_weekday));

    start.iter_days().take_while(|d| *d <= end).collect()
}

/// A month laid out as whole weeks.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub first_weekday: Weekday,
    pub dates: Vec<NaiveDate>,
}

impl MonthGrid {
    pub fn new(month: YearMonth, first_weekday: Weekday) -> Self {
        MonthGrid {
            month,
            first_weekday,
            dates: month_grid(month, first_weekday),
        }
    }

    /// Rows of seven dates.
    pub fn weeks(&self) -> impl Iterator<Item = &[NaiveDate]> {
        self.dates.chunks(7)
    }

    pub fn is_in_month(&self, date: NaiveDate) -> bool {
        self.month.contains(date)
    }

    /// Short weekday names in column order ("Mon", "Tue", ...).
    pub fn weekday_labels(&self) -> Vec<String> {
        let mut day = self.first_weekday;
        let mut labels = Vec::with_capacity(7);
        for _ in 0..7 {
            labels.push(day.to_string());
            day = day.succ();
        }
        labels
    }
}
