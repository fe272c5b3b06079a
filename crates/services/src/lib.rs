#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use kyu_core::Clock;
pub use sessions as session;

pub use error::SessionError;

pub use sessions::{
    AnswerResult, FlashcardCommand, FlashcardSession, FlashcardSnapshot, QuizCommand,
    QuizSession, QuizSnapshot, ResultReason, SessionHandle, TimedSession, TimerSnapshot,
};
