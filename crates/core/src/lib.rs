#![forbid(unsafe_code)]

pub mod countdown;
pub mod model;

pub use countdown::{Countdown, TickOutcome, WARNING_THRESHOLD_SECS};
