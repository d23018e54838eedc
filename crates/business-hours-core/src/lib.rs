pub mod date;
pub mod error;
pub mod parse;
pub mod timespan;

pub use date::{BusinessHours, Date};
pub use error::CalendarError;
pub use timespan::Timespan;
