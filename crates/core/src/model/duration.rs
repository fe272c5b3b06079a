use serde::Serialize;
use std::fmt;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("countdown duration must be 5, 10 or 15 seconds (got {0})")]
    InvalidDuration(u32),

    #[error("catalog has {available} grades, at least {required} are needed")]
    CatalogTooSmall { required: usize, available: usize },
}

//
// ─── TIMER DURATION ────────────────────────────────────────────────────────────
//

/// Allowed countdown lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "u32")]
pub enum TimerDuration {
    Five,
    #[default]
    Ten,
    Fifteen,
}

impl TimerDuration {
    pub const ALL: [TimerDuration; 3] = [Self::Five, Self::Ten, Self::Fifteen];

    /// Converts a number of seconds into a `TimerDuration`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidDuration` for anything other than 5, 10 or 15.
    pub fn from_secs(secs: u32) -> Result<Self, ConfigError> {
        match secs {
            5 => Ok(Self::Five),
            10 => Ok(Self::Ten),
            15 => Ok(Self::Fifteen),
            other => Err(ConfigError::InvalidDuration(other)),
        }
    }

    #[must_use]
    pub fn secs(self) -> u32 {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
            Self::Fifteen => 15,
        }
    }
}

impl TryFrom<u32> for TimerDuration {
    type Error = ConfigError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_secs(value)
    }
}

impl From<TimerDuration> for u32 {
    fn from(value: TimerDuration) -> Self {
        value.secs()
    }
}

impl fmt::Display for TimerDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_fixed_set() {
        for secs in [5, 10, 15] {
            assert_eq!(TimerDuration::from_secs(secs).unwrap().secs(), secs);
        }
        for secs in [0, 1, 6, 20, 600] {
            assert_eq!(
                TimerDuration::try_from(secs),
                Err(ConfigError::InvalidDuration(secs))
            );
        }
    }

    #[test]
    fn defaults_to_ten_seconds() {
        assert_eq!(TimerDuration::default(), TimerDuration::Ten);
        assert_eq!(TimerDuration::default().to_string(), "10s");
    }
}
