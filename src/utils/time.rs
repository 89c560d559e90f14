//! Time and timestamp utilities

use chrono::Utc;

/// Get the current Unix timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Milliseconds elapsed from `earlier` to `later`, clamped at zero
pub fn millis_between(earlier: i64, later: i64) -> u64 {
    later.saturating_sub(earlier).max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_is_recent() {
        // 2020-01-01T00:00:00Z
        assert!(now_millis() > 1_577_836_800_000);
    }

    #[test]
    fn test_millis_between_clamps() {
        assert_eq!(millis_between(100, 250), 150);
        assert_eq!(millis_between(250, 100), 0);
    }
}
