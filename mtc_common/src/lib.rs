pub mod helpers;
mod secret;

pub use helpers::{parse_clock_time, parse_travel_date, DateTimeFormatError};
pub use secret::Secret;
