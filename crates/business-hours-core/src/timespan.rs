use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::{BusinessHours, Date};
use crate::error::CalendarError;
use crate::parse;

/// An inclusive date range with a daily business-hours window in one timezone.
///
/// Dates are `YYYY-MM-DD`, hours are `HH:MM:SS`, and the timezone is an IANA
/// identifier such as `Asia/Jakarta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timespan {
    pub start_date: String,
    pub end_date: String,
    pub day_start_hour: String,
    pub day_end_hour: String,
    pub timezone: String,
}

impl Timespan {
    fn start_date_to_time(&self) -> Result<DateTime<Tz>, CalendarError> {
        parse::date_string_to_time(&self.start_date, &self.timezone)
    }

    fn end_date_to_time(&self) -> Result<DateTime<Tz>, CalendarError> {
        parse::date_string_to_time(&self.end_date, &self.timezone)
    }

    /// Every date from start to end, both included.
    /// Returns an empty vec if the end date is before the start date.
    pub fn dates_in_between(&self) -> Result<Vec<Date>, CalendarError> {
        let first = self.start_date_to_time()?;
        let last = self.end_date_to_time()?;
        debug!("Enumerating dates from {first} to {last}");

        let tz = first.timezone();
        let mut dates = Vec::new();
        let mut today = first;
        while today <= last {
            let day = today.date_naive();
            dates.push(Date::from(day));
            let Some(tomorrow) = day.succ_opt() else {
                break;
            };
            today = parse::start_of_day(tomorrow, tz);
        }
        Ok(dates)
    }

    /// Business hours of each date in the range, in date order.
    /// Stops at the first date that fails to convert.
    pub fn business_hours_of_each_date(&self) -> Result<Vec<BusinessHours>, CalendarError> {
        self.dates_in_between()?
            .iter()
            .map(|d| d.to_business_hours(&self.day_start_hour, &self.day_end_hour, &self.timezone))
            .collect()
    }
}
