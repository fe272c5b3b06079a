use crate::model::duration::{ConfigError, TimerDuration};

/// Per-session configuration.
///
/// `seed` pins the random source so that grade and option order are
/// reproducible; `None` seeds from the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSettings {
    duration: TimerDuration,
    seed: Option<u64>,
}

impl SessionSettings {
    /// Creates settings from raw values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidDuration` if `duration_secs` is not an allowed duration.
    pub fn new(duration_secs: u32, seed: Option<u64>) -> Result<Self, ConfigError> {
        Ok(Self {
            duration: TimerDuration::from_secs(duration_secs)?,
            seed,
        })
    }

    #[must_use]
    pub fn with_duration(mut self, duration: TimerDuration) -> Self {
        self.duration = duration;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn duration(&self) -> TimerDuration {
        self.duration
    }

    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validates_duration() {
        let settings = SessionSettings::new(15, Some(7)).unwrap();
        assert_eq!(settings.duration(), TimerDuration::Fifteen);
        assert_eq!(settings.seed(), Some(7));

        let err = SessionSettings::new(12, None).unwrap_err();
        assert_eq!(err, ConfigError::InvalidDuration(12));
    }

    #[test]
    fn default_is_ten_seconds_unseeded() {
        let settings = SessionSettings::default();
        assert_eq!(settings.duration(), TimerDuration::Ten);
        assert_eq!(settings.seed(), None);
    }
}
