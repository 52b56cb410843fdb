//! Shared helpers for numeric derivations, time periods and user input.

pub mod math;
pub mod time;
pub mod validation;

pub use math::{is_approved, percent_of, percentages};
pub use time::{format_time_period, get_time_periods, now_secs, time_lock_remaining, TimePeriods};
pub use validation::{parse_amount, validate_address};
