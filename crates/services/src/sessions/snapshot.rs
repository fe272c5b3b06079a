use serde::Serialize;

use kyu_core::model::{GradeRecord, QuizQuestion, ScoreTracker};
use kyu_core::{CountdownTimer, TimerState};

use super::quiz::AnswerResult;

/// Read-only countdown view for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub duration_secs: u32,
    pub remaining_secs: f64,
    pub progress: f64,
    pub state: TimerState,
}

impl TimerSnapshot {
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }
}

impl From<&CountdownTimer> for TimerSnapshot {
    fn from(timer: &CountdownTimer) -> Self {
        Self {
            duration_secs: timer.duration().secs(),
            remaining_secs: timer.remaining_secs(),
            progress: timer.progress(),
            state: timer.state(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardSnapshot {
    pub current: GradeRecord,
    pub previous: Option<GradeRecord>,
    pub timer: TimerSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSnapshot {
    pub question: QuizQuestion,
    pub result: Option<AnswerResult>,
    pub score: ScoreTracker,
    pub accuracy_percent: u32,
    pub timer: TimerSnapshot,
    /// The user pressed play and has not paused since.
    pub run_intent: bool,
    pub can_advance: bool,
}
