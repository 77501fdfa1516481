//! Date range for filtering events.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::error::{WorklyError, WorklyResult};
use crate::event::Event;

/// Date range for filtering events, half-open `[from, to)`.
/// None values mean unbounded in that direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        DateRange {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Parse command-line style bounds in `tz`.
    /// - `from`: YYYY-MM-DD, "start" for unbounded, defaults to `today`
    /// - `to`: YYYY-MM-DD (inclusive), unbounded if not specified
    pub fn from_args<Tz: TimeZone>(
        from: Option<&str>,
        to: Option<&str>,
        today: NaiveDate,
        tz: &Tz,
    ) -> WorklyResult<Self> {
        let from_dt = match from {
            Some("start") => None,
            Some(s) => Some(start_of_day(parse_date(s)?, tz)?),
            None => Some(start_of_day(today, tz)?),
        };

        let to_dt = match to {
            Some(s) => {
                let day = parse_date(s)?;
                let next = day.succ_opt().ok_or_else(|| {
                    WorklyError::Validation(format!("Date '{}' is out of range", s))
                })?;
                Some(start_of_day(next, tz)?)
            }
            None => None,
        };

        let range = DateRange {
            from: from_dt,
            to: to_dt,
        };
        if let (Some(from), Some(to)) = (range.from, range.to) {
            crate::validation::validate_dates(&from, &to).into_result()?;
        }
        Ok(range)
    }

    pub fn contains(&self, event: &Event) -> bool {
        let from = self.from.unwrap_or(DateTime::<Utc>::MIN_UTC);
        let to = self.to.unwrap_or(DateTime::<Utc>::MAX_UTC);
        event.overlaps(from, to)
    }
}

fn parse_date(s: &str) -> WorklyResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        WorklyError::Validation(format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
    })
}

/// Midnight of `date` in `tz`, as UTC.
pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> WorklyResult<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(chrono::NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| WorklyError::Validation(format!("{} has no midnight in this time zone", date)))
}
