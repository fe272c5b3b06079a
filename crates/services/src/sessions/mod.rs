mod flashcard;
mod quiz;
mod runner;
mod snapshot;

use rand::SeedableRng;
use rand::rngs::StdRng;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use flashcard::{FlashcardCommand, FlashcardSession};
pub use quiz::{AnswerResult, QuizCommand, QuizSession, ResultReason};
pub use runner::{SessionHandle, TimedSession};
pub use snapshot::{FlashcardSnapshot, QuizSnapshot, TimerSnapshot};

/// Random source for a session: reproducible when seeded, OS entropy otherwise.
pub(crate) fn session_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
}
