use core::fmt;

use serde::{Deserialize, Serialize};

pub const SECONDS_PER_MINUTE: u64 = 60;
pub const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
pub const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Inactivity period in seconds for a whole number of days.
pub fn period_seconds_from_days(days: u64) -> u64 {
    days.saturating_mul(SECONDS_PER_DAY)
}

/// Inactivity period rounded to the nearest whole day (half rounds up).
pub fn period_in_days(period_seconds: u64) -> u64 {
    let days = period_seconds / SECONDS_PER_DAY;
    let rest = period_seconds % SECONDS_PER_DAY;
    if rest * 2 >= SECONDS_PER_DAY {
        days + 1
    } else {
        days
    }
}

/// Time left until a deadline, broken into calendar-style units.
///
/// Renders as `"2d 3h"`, `"1h 30m"` or `"4m 9s"`: zero units are dropped,
/// minutes are always shown below one hour and seconds only below one hour.
/// A passed deadline renders as `"expired"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRemaining {
    pub total_seconds: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeRemaining {
    /// Splits a non-negative number of seconds.
    pub fn from_seconds(total_seconds: u64) -> Self {
        Self {
            total_seconds,
            days: total_seconds / SECONDS_PER_DAY,
            hours: (total_seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
            minutes: (total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
            seconds: total_seconds % SECONDS_PER_MINUTE,
        }
    }

    /// Remaining time from `now` until `deadline`, saturating at zero.
    pub fn until(deadline: u64, now: u64) -> Self {
        Self::from_seconds(deadline.saturating_sub(now))
    }

    pub fn is_expired(&self) -> bool {
        self.total_seconds == 0
    }
}

impl fmt::Display for TimeRemaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_expired() {
            return f.write_str("expired");
        }
        let under_an_hour = self.days == 0 && self.hours == 0;
        let mut parts = Vec::with_capacity(4);
        if self.days > 0 {
            parts.push(format!("{}d", self.days));
        }
        if self.hours > 0 {
            parts.push(format!("{}h", self.hours));
        }
        if self.minutes > 0 || under_an_hour {
            parts.push(format!("{}m", self.minutes));
        }
        if under_an_hour {
            parts.push(format!("{}s", self.seconds));
        }
        f.write_str(&parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_largest_units_first() {
        let remaining = TimeRemaining::from_seconds(2 * SECONDS_PER_DAY + 3 * SECONDS_PER_HOUR + 12);
        assert_eq!(remaining.to_string(), "2d 3h");
        assert_eq!(remaining.seconds, 12);
    }

    #[test]
    fn seconds_only_show_under_an_hour() {
        assert_eq!(TimeRemaining::from_seconds(5 * 60 + 7).to_string(), "5m 7s");
        assert_eq!(TimeRemaining::from_seconds(9).to_string(), "0m 9s");
        assert_eq!(TimeRemaining::from_seconds(SECONDS_PER_HOUR + 90).to_string(), "1h 1m");
        assert_eq!(TimeRemaining::from_seconds(SECONDS_PER_HOUR).to_string(), "1h");
    }

    #[test]
    fn passed_deadline_is_expired() {
        let remaining = TimeRemaining::until(1_000, 1_500);
        assert!(remaining.is_expired());
        assert_eq!(remaining.to_string(), "expired");
        assert_eq!(TimeRemaining::until(1_000, 1_000).to_string(), "expired");
    }

    #[test]
    fn period_conversions() {
        assert_eq!(period_seconds_from_days(365), 31_536_000);
        assert_eq!(period_in_days(31_536_000), 365);
        assert_eq!(period_in_days(SECONDS_PER_DAY / 2), 1);
        assert_eq!(period_in_days(SECONDS_PER_DAY / 2 - 1), 0);
        assert_eq!(period_seconds_from_days(u64::MAX), u64::MAX);
    }
}
