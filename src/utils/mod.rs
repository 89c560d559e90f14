//! Utility functions

mod time;

pub use time::{millis_between, now_millis};
