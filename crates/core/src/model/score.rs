use serde::Serialize;

/// Running quiz statistics.
///
/// Invariants: `correct_count <= total_answered` and
/// `best_streak >= current_streak`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTracker {
    total_answered: u32,
    correct_count: u32,
    current_streak: u32,
    best_streak: u32,
}

impl ScoreTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one resolved question. Timeouts count as incorrect.
    pub fn record_attempt(&mut self, correct: bool) {
        self.total_answered += 1;
        if correct {
            self.correct_count += 1;
            self.current_streak += 1;
            self.best_streak = self.best_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
        }
    }

    /// Rounded share of correct answers, 0 when nothing has been answered.
    #[must_use]
    pub fn accuracy_percent(&self) -> u32 {
        if self.total_answered == 0 {
            return 0;
        }
        let correct = u64::from(self.correct_count);
        let total = u64::from(self.total_answered);
        // Half-up rounding of 100 * correct / total.
        let rounded = (200 * correct + total) / (2 * total);
        u32::try_from(rounded).unwrap_or(100)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn total_answered(&self) -> u32 {
        self.total_answered
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    #[must_use]
    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn mixed_sequence_tracks_streaks() {
        let mut score = ScoreTracker::new();
        assert_eq!(score, ScoreTracker::default());

        score.record_attempt(true);
        score.record_attempt(true);
        score.record_attempt(false);
        score.record_attempt(true);

        assert_eq!(score.total_answered(), 4);
        assert_eq!(score.correct_count(), 3);
        assert_eq!(score.current_streak(), 1);
        assert_eq!(score.best_streak(), 2);
        assert_eq!(score.accuracy_percent(), 75);
    }

    #[test]
    fn accuracy_is_zero_before_any_answer() {
        assert_eq!(ScoreTracker::new().accuracy_percent(), 0);
    }

    #[test]
    fn accuracy_rounds_half_up() {
        let mut score = ScoreTracker::new();
        score.record_attempt(true);
        score.record_attempt(false);
        score.record_attempt(false);
        // 33.3 -> 33
        assert_eq!(score.accuracy_percent(), 33);
        score.record_attempt(true);
        score.record_attempt(true);
        score.record_attempt(true);
        score.record_attempt(true);
        score.record_attempt(true);
        // 6/8 = 75
        assert_eq!(score.accuracy_percent(), 75);

        let mut two_thirds = ScoreTracker::new();
        two_thirds.record_attempt(true);
        two_thirds.record_attempt(true);
        two_thirds.record_attempt(false);
        assert_eq!(two_thirds.accuracy_percent(), 67);

        let mut half = ScoreTracker::new();
        for correct in [true, false, false, false, false, false, false, false] {
            half.record_attempt(correct);
        }
        // 12.5 -> 13
        assert_eq!(half.accuracy_percent(), 13);
    }

    #[test]
    fn invariants_hold_for_random_sequences() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut score = ScoreTracker::new();
        for _ in 0..5000 {
            score.record_attempt(rng.random_bool(0.6));
            assert!(score.correct_count() <= score.total_answered());
            assert!(score.best_streak() >= score.current_streak());
            assert!(score.accuracy_percent() <= 100);
        }
    }

    #[test]
    fn reset_clears_everything() {
        let mut score = ScoreTracker::new();
        score.record_attempt(true);
        score.reset();
        assert_eq!(score, ScoreTracker::default());
    }
}
