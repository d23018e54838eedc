//! Structured parsing of date strings, clock strings and timezone names.
//!
//! Every component is validated against its calendar range. Out-of-range
//! months or days are rejected instead of rolling over into the next month.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;
use tracing::warn;

use crate::error::CalendarError;

/// Resolve an IANA timezone identifier such as `Asia/Jakarta`.
pub fn parse_timezone(name: &str) -> Result<Tz, CalendarError> {
    name.parse::<Tz>()
        .map_err(|_| CalendarError::TimezoneResolution {
            name: name.to_string(),
        })
}

/// Parse a `YYYY-MM-DD` string into a calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate, CalendarError> {
    let parts: Vec<&str> = input.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return Err(CalendarError::InvalidDate {
            input: input.to_string(),
        });
    };

    let year: i32 = year
        .parse()
        .ok()
        .filter(|y| NaiveDate::from_ymd_opt(*y, 1, 1).is_some())
        .ok_or_else(|| CalendarError::InvalidYear {
            input: year.to_string(),
        })?;
    let month: u32 = month
        .parse()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| CalendarError::InvalidMonth {
            input: month.to_string(),
        })?;
    day.parse::<u32>()
        .ok()
        .and_then(|d| NaiveDate::from_ymd_opt(year, month, d))
        .ok_or_else(|| CalendarError::InvalidDay {
            input: day.to_string(),
            year,
            month,
        })
}

/// Parse an `HH:MM:SS` clock string. Each component must be exactly two digits.
pub fn parse_clock(input: &str) -> Option<NaiveTime> {
    let mut parts = input.split(':');
    let hour = two_digits(parts.next()?)?;
    let minute = two_digits(parts.next()?)?;
    let second = two_digits(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    NaiveTime::from_hms_opt(hour, minute, second)
}

fn two_digits(s: &str) -> Option<u32> {
    if s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse().ok()
    } else {
        None
    }
}

/// Map a wall-clock time in `tz` to an absolute instant.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// DST gap are read with the offset in effect before the gap, so 02:30 on a
/// spring-forward night becomes 03:30 after it.
pub fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    if let Some(resolved) = tz.from_local_datetime(&naive).earliest() {
        return resolved;
    }
    let before = tz.offset_from_utc_datetime(&(naive - TimeDelta::days(1))).fix();
    let resolved =
        tz.from_utc_datetime(&(naive - TimeDelta::seconds(i64::from(before.local_minus_utc()))));
    warn!("{naive} does not exist in {}, using {resolved}", tz.name());
    resolved
}

/// Midnight at the start of a calendar day in `tz`.
pub fn start_of_day(date: NaiveDate, tz: Tz) -> DateTime<Tz> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

/// Parse a `YYYY-MM-DD` string into local midnight of that date in `timezone`.
pub fn date_string_to_time(date: &str, timezone: &str) -> Result<DateTime<Tz>, CalendarError> {
    let date = parse_date(date)?;
    let tz = parse_timezone(timezone)?;
    Ok(start_of_day(date, tz))
}

/// Parse a `YYYY-MM-DDTHH:MM:SS` string as a wall-clock time in `timezone`.
pub fn parse_local_datetime(input: &str, timezone: &str) -> Result<DateTime<Tz>, CalendarError> {
    let tz = parse_timezone(timezone)?;
    let naive = input
        .split_once('T')
        .and_then(|(date, time)| Some(parse_layout_date(date)?.and_time(parse_clock(time)?)))
        .ok_or_else(|| CalendarError::TimeParse {
            input: input.to_string(),
        })?;
    Ok(resolve_local(tz, naive))
}

/// Date half of the combined layout: exactly `YYYY-MM-DD`.
fn parse_layout_date(input: &str) -> Option<NaiveDate> {
    let bytes = input.as_bytes();
    let fixed_width = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !fixed_width {
        return None;
    }
    parse_date(input).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_date_valid() {
        assert_eq!(parse_date("2020-07-10").unwrap(), date(2020, 7, 10));
        assert_eq!(parse_date("2024-02-29").unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn parse_date_wrong_separator() {
        assert_eq!(
            parse_date("2020/07/10"),
            Err(CalendarError::InvalidDate {
                input: "2020/07/10".into()
            })
        );
        assert!(matches!(
            parse_date("2020-07"),
            Err(CalendarError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse_date("2020-07-10-01"),
            Err(CalendarError::InvalidDate { .. })
        ));
    }

    #[test]
    fn parse_date_non_numeric_components() {
        assert_eq!(
            parse_date("YYYY-07-10"),
            Err(CalendarError::InvalidYear {
                input: "YYYY".into()
            })
        );
        assert_eq!(
            parse_date("2020-AB-10"),
            Err(CalendarError::InvalidMonth { input: "AB".into() })
        );
        assert_eq!(
            parse_date("2020-07-x1"),
            Err(CalendarError::InvalidDay {
                input: "x1".into(),
                year: 2020,
                month: 7
            })
        );
    }

    #[test]
    fn parse_date_rejects_rollover() {
        assert!(matches!(
            parse_date("2020-13-01"),
            Err(CalendarError::InvalidMonth { .. })
        ));
        assert!(matches!(
            parse_date("2020-00-01"),
            Err(CalendarError::InvalidMonth { .. })
        ));
        assert!(matches!(
            parse_date("2021-02-29"),
            Err(CalendarError::InvalidDay { .. })
        ));
        assert!(matches!(
            parse_date("2020-04-31"),
            Err(CalendarError::InvalidDay { .. })
        ));
        assert!(matches!(
            parse_date("2020-04-00"),
            Err(CalendarError::InvalidDay { .. })
        ));
    }

    #[test]
    fn parse_date_year_out_of_calendar() {
        assert!(matches!(
            parse_date("999999999-01-01"),
            Err(CalendarError::InvalidYear { .. })
        ));
    }

    #[test]
    fn parse_timezone_unknown() {
        assert_eq!(
            parse_timezone("Nowhere/Place"),
            Err(CalendarError::TimezoneResolution {
                name: "Nowhere/Place".into()
            })
        );
        assert_eq!(parse_timezone("Asia/Jakarta").unwrap(), Tz::Asia__Jakarta);
    }

    #[test]
    fn parse_clock_layout() {
        assert_eq!(
            parse_clock("08:00:00"),
            NaiveTime::from_hms_opt(8, 0, 0)
        );
        assert_eq!(
            parse_clock("23:59:59"),
            NaiveTime::from_hms_opt(23, 59, 59)
        );
        assert_eq!(parse_clock("8:00:00"), None);
        assert_eq!(parse_clock("08:00"), None);
        assert_eq!(parse_clock("08:00:00:00"), None);
        assert_eq!(parse_clock("24:00:00"), None);
        assert_eq!(parse_clock("08:60:00"), None);
        assert_eq!(parse_clock("+8:00:00"), None);
    }

    #[test]
    fn date_string_to_time_is_local_midnight() {
        let t = date_string_to_time("2020-07-10", "Asia/Jakarta").unwrap();
        assert_eq!(t.date_naive(), date(2020, 7, 10));
        assert_eq!(t.hour(), 0);
        // Jakarta is UTC+7 with no DST
        let utc = t.with_timezone(&Utc);
        assert_eq!((utc.day(), utc.hour()), (9, 17));
    }

    #[test]
    fn date_string_to_time_errors() {
        assert!(matches!(
            date_string_to_time("2020/07/10", "Asia/Jakarta"),
            Err(CalendarError::InvalidDate { .. })
        ));
        assert!(matches!(
            date_string_to_time("2020-07-10", "Nowhere/Place"),
            Err(CalendarError::TimezoneResolution { .. })
        ));
    }

    #[test]
    fn midnight_inside_dst_gap_moves_forward() {
        // Sao Paulo skipped from 00:00 to 01:00 on 2018-11-04
        let t = date_string_to_time("2018-11-04", "America/Sao_Paulo").unwrap();
        assert_eq!(t.date_naive(), date(2018, 11, 4));
        assert_eq!(t.hour(), 1);
    }

    #[test]
    fn ambiguous_time_takes_earlier_instant() {
        // New York repeated 01:00-02:00 on 2024-11-03
        let t = parse_local_datetime("2024-11-03T01:30:00", "America/New_York").unwrap();
        let utc = t.with_timezone(&Utc);
        assert_eq!(utc.hour(), 5);
    }

    #[test]
    fn gap_time_uses_offset_before_transition() {
        // New York skipped from 02:00 EST to 03:00 EDT on 2025-03-09
        let t = parse_local_datetime("2025-03-09T02:30:00", "America/New_York").unwrap();
        assert_eq!(t.timestamp(), 1_741_505_400);
        assert_eq!((t.hour(), t.minute()), (3, 30));

        let t = parse_local_datetime("2025-03-09T02:45:00", "America/New_York").unwrap();
        assert_eq!((t.hour(), t.minute()), (3, 45));
        assert_eq!(t.with_timezone(&Utc).hour(), 7);
    }

    #[test]
    fn parse_local_datetime_valid() {
        let t = parse_local_datetime("2020-07-01T08:00:00", "UTC").unwrap();
        assert_eq!(t.with_timezone(&Utc), Utc.with_ymd_and_hms(2020, 7, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn parse_local_datetime_layout_errors() {
        for input in [
            "2020-07-10 08:00:00",
            "2020-07-10T8:00:00",
            "2020-7-10T08:00:00",
            "2020-07-1T08:00:00",
            "20-07-10T08:00:00",
            "2020-07-32T08:00:00",
            "2020-07-10T25:00:00",
        ] {
            assert_eq!(
                parse_local_datetime(input, "UTC"),
                Err(CalendarError::TimeParse {
                    input: input.to_string()
                }),
                "{input}"
            );
        }
    }
}
