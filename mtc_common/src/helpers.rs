use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

/// Clock times as published by the ticket source and accepted from users, e.g. "06:05".
pub const CLOCK_TIME_FORMAT: &str = "%H:%M";
/// Some upstream records carry seconds as well.
const CLOCK_TIME_FORMAT_LONG: &str = "%H:%M:%S";
pub const TRAVEL_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateTimeFormatError {
    #[error("'{0}' is not a valid clock time. Expected HH:MM")]
    InvalidClockTime(String),
    #[error("'{0}' is not a valid travel date. Expected YYYY-MM-DD")]
    InvalidTravelDate(String),
}

/// Parses a same-day clock time. Both `HH:MM` and `HH:MM:SS` are accepted.
pub fn parse_clock_time(value: &str) -> Result<NaiveTime, DateTimeFormatError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, CLOCK_TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, CLOCK_TIME_FORMAT_LONG))
        .map_err(|_| DateTimeFormatError::InvalidClockTime(value.to_string()))
}

pub fn parse_travel_date(value: &str) -> Result<NaiveDate, DateTimeFormatError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, TRAVEL_DATE_FORMAT)
        .map_err(|_| DateTimeFormatError::InvalidTravelDate(value.to_string()))
}
