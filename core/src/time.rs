//! Wall-clock capture
//!
//! Domain mutators take an explicit `now: i64` (unix seconds); only the
//! outer layers call this helper, which keeps time-dependent guards
//! deterministic under test.

use chrono::Utc;

pub fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_is_recent() {
        // 2024-01-01 as a floor
        assert!(current_timestamp() > 1_704_067_200);
    }
}
