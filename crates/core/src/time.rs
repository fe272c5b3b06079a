use chrono::{DateTime, Utc};

/// Real-time cadence of countdown ticks.
pub const TICK_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);

/// Countdown decrement per tick, in tenths of a second.
pub const TENTHS_PER_TICK: u32 = 1;

/// How long a quiz result stays visible before the next question is shown.
pub const AUTO_ADVANCE_DELAY: std::time::Duration = std::time::Duration::from_secs(2);

/// Where a quiz reads the creation time stamped into question ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    /// Every question gets the same instant.
    Fixed(DateTime<Utc>),
}

impl Clock {
    #[must_use]
    pub fn system() -> Self {
        Self::System
    }

    #[must_use]
    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::System => Utc::now(),
            Self::Fixed(at) => *at,
        }
    }
}

/// Unix millis used by [`fixed_now`] (2023-11-14T22:13:20Z).
pub const FIXED_TEST_MILLIS: i64 = 1_700_000_000_000;

/// Deterministic instant for question ids in tests.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(FIXED_TEST_MILLIS).unwrap_or_default()
}

#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_repeats_its_instant() {
        let clock = fixed_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().timestamp_millis(), FIXED_TEST_MILLIS);
    }

    #[test]
    fn system_clock_is_the_default() {
        assert_eq!(Clock::default(), Clock::system());
        assert!(Clock::system().now() > fixed_now());
    }

    #[test]
    fn tick_cadence_matches_decrement() {
        let tick_tenths = TICK_INTERVAL.as_millis() / 100;
        assert_eq!(tick_tenths, u128::from(TENTHS_PER_TICK));
    }
}
