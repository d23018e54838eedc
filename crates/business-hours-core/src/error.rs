use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("Invalid date {input:?}: expected YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("Invalid year {input:?}")]
    InvalidYear { input: String },

    #[error("Invalid month {input:?}: expected 01-12")]
    InvalidMonth { input: String },

    #[error("Invalid day {input:?} for {year}-{month:02}")]
    InvalidDay { input: String, year: i32, month: u32 },

    #[error("Unknown timezone {name:?}")]
    TimezoneResolution { name: String },

    #[error("Invalid date-time {input:?}: expected YYYY-MM-DDTHH:MM:SS")]
    TimeParse { input: String },

    #[error("Timestamp {timestamp} does not fit in 32 bits")]
    TimestampOutOfRange { timestamp: i64 },
}
