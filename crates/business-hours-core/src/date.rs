use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CalendarError;
use crate::parse;

/// A calendar day with no time of day or timezone attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Date {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl Date {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Business hours of this date in `timezone`, from `start_hour` to `end_hour`.
    /// Both hours are `HH:MM:SS` strings.
    pub fn to_business_hours(
        &self,
        start_hour: &str,
        end_hour: &str,
        timezone: &str,
    ) -> Result<BusinessHours, CalendarError> {
        let start = parse::parse_local_datetime(&format!("{self}T{start_hour}"), timezone)?;
        let end = parse::parse_local_datetime(&format!("{self}T{end_hour}"), timezone)?;
        debug!("{self}: business hours {start} to {end}");

        Ok(BusinessHours {
            start: epoch_seconds(start.timestamp())?,
            end: epoch_seconds(end.timestamp())?,
        })
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

/// `YYYY-MM-DD`, with month and day padded to two digits.
impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for Date {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse_date(s).map(Date::from)
    }
}

/// Start and end of business hours on one date, as Unix epoch seconds.
///
/// Stored as `i32` for compatibility with existing consumers, so instants
/// after 2038-01-19T03:14:07Z are rejected rather than truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BusinessHours {
    pub start: i32,
    pub end: i32,
}

impl BusinessHours {
    /// Length of the window. Negative if the end hour is before the start hour.
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.end) - i64::from(self.start))
    }

    pub fn start_utc(&self) -> DateTime<Utc> {
        to_utc(self.start)
    }

    pub fn end_utc(&self) -> DateTime<Utc> {
        to_utc(self.end)
    }
}

fn epoch_seconds(timestamp: i64) -> Result<i32, CalendarError> {
    i32::try_from(timestamp).map_err(|_| CalendarError::TimestampOutOfRange { timestamp })
}

fn to_utc(seconds: i32) -> DateTime<Utc> {
    DateTime::from_timestamp(i64::from(seconds), 0).unwrap_or_default()
}
