//! UTC instants used for session activity and expiry.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// True when `now` falls in `[self, self + window)`.
    ///
    /// A `now` earlier than `self` (clock skew) is outside the window. A window
    /// too large for chrono never closes.
    pub fn is_within(&self, window: std::time::Duration, now: &Timestamp) -> bool {
        let elapsed = now.0.signed_duration_since(self.0);
        if elapsed < Duration::zero() {
            return false;
        }
        Duration::from_std(window).map_or(true, |window| elapsed < window)
    }

    /// Shifts the instant into the past. Saturates instead of overflowing.
    pub fn minus_secs(&self, secs: u64) -> Self {
        let secs = i64::try_from(secs).unwrap_or(i64::MAX);
        self.0
            .checked_sub_signed(Duration::seconds(secs))
            .map_or(*self, Self)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;

    #[test]
    fn window_is_half_open() {
        let now = Timestamp::now();
        let window = StdDuration::from_secs(5);

        assert!(now.minus_secs(4).is_within(window, &now));
        assert!(!now.minus_secs(5).is_within(window, &now));
        assert!(!now.minus_secs(60).is_within(window, &now));
    }

    #[test]
    fn future_start_is_outside_the_window() {
        let now = Timestamp::now();
        assert!(!now.is_within(StdDuration::from_secs(5), &now.minus_secs(1)));
    }

    #[test]
    fn serializes_as_rfc3339_string() {
        let ts = Timestamp::now();
        let json = serde_json::to_value(ts).unwrap();
        assert!(json.as_str().is_some_and(|s| s.contains('T')));
        assert_eq!(serde_json::from_value::<Timestamp>(json).unwrap(), ts);
    }
}
