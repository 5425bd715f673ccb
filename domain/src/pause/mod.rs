//! Coffee-break overlay
//!
//! An advisory "the table is on a break" flag with an end time, orthogonal
//! to round state. Voting is not blocked while paused, and the break
//! expires implicitly once the end time passes; there is no resume
//! mutation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default break length, in minutes.
pub const DEFAULT_BREAK_MINUTES: i64 = 5;

/// The pause overlay of a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoffeeBreak {
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

impl CoffeeBreak {
    /// Start a break ending `minutes` from `now`.
    pub fn begin(&mut self, now: DateTime<Utc>, minutes: i64) {
        self.active = true;
        self.end = Some(now + Duration::minutes(minutes));
    }

    /// Whether the break is still running at `now`.
    ///
    /// `now == end` already counts as resumed.
    pub fn is_paused(&self, now: DateTime<Utc>) -> bool {
        match self.end {
            Some(end) => self.active && now < end,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_inactive_by_default() {
        let brk = CoffeeBreak::default();
        assert!(!brk.is_paused(at(0)));
    }

    #[test]
    fn test_begin_sets_end_time() {
        let mut brk = CoffeeBreak::default();
        brk.begin(at(0), 5);

        assert!(brk.active);
        assert_eq!(brk.end, Some(at(300)));
        assert!(brk.is_paused(at(0)));
        assert!(brk.is_paused(at(299)));
    }

    #[test]
    fn test_resume_is_implicit_at_end_time() {
        let mut brk = CoffeeBreak::default();
        brk.begin(at(0), 5);

        assert!(!brk.is_paused(at(300)));
        assert!(!brk.is_paused(at(301)));
        // the flag itself is untouched; only the clock decides
        assert!(brk.active);
    }
}
