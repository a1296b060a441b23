use chrono::{DateTime, Duration, Utc};
use tokio::time::Instant;

/// Seconds a token with `remaining` seconds of lifetime may be served from the cache.
///
/// The margin only applies when the lifetime is longer than the margin itself,
/// otherwise the full lifetime is used.
pub fn cache_ttl_seconds(remaining: u64, safety_margin: u64) -> u64 {
    if remaining > safety_margin {
        remaining - safety_margin
    } else {
        remaining
    }
}

/// Whole seconds left until `deadline`, zero once it has passed.
pub fn seconds_until(deadline: DateTime<Utc>, from: DateTime<Utc>) -> u64 {
    u64::try_from((deadline - from).num_seconds()).unwrap_or(0)
}

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

pub fn add_seconds(from: DateTime<Utc>, seconds: u64) -> DateTime<Utc> {
    i64::try_from(seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| from.checked_add_signed(lifetime))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

pub fn get_instant() -> Instant {
    Instant::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margin_is_subtracted_from_long_lifetimes() {
        assert_eq!(cache_ttl_seconds(32_400, 60), 32_340);
    }

    #[test]
    fn margin_is_skipped_for_short_lifetimes() {
        assert_eq!(cache_ttl_seconds(30, 60), 30);
        assert_eq!(cache_ttl_seconds(60, 60), 60);
    }

    #[test]
    fn remaining_lifetime_rounds_down_and_clamps() {
        let start = now();
        assert_eq!(seconds_until(start + Duration::milliseconds(1_999), start), 1);
        assert_eq!(seconds_until(start + Duration::milliseconds(500), start), 0);
        assert_eq!(seconds_until(start - Duration::seconds(3), start), 0);
    }

    #[test]
    fn huge_lifetimes_saturate_instead_of_overflowing() {
        let start = now();
        assert_eq!(add_seconds(start, u64::MAX), DateTime::<Utc>::MAX_UTC);
        assert_eq!(add_seconds(start, 10), start + Duration::seconds(10));
    }
}
