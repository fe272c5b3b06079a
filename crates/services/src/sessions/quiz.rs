use rand::rngs::StdRng;
use serde::Serialize;
use std::fmt;

use kyu_core::model::{
    Catalog, ConfigError, OPTION_COUNT, QuizQuestion, ScoreTracker, SessionSettings,
    TimerDuration,
};
use kyu_core::{Clock, CountdownTimer, TickOutcome};

use super::runner::TimedSession;
use super::session_rng;
use super::snapshot::{QuizSnapshot, TimerSnapshot};
use crate::error::SessionError;

/// Commands accepted by a running quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizCommand {
    Start,
    Pause,
    /// Pause, draw a fresh question and zero the score.
    Reset,
    ChangeDuration(u32),
    /// Answer with the option's text.
    Submit(String),
    /// Answer with the option at a zero-based position.
    SubmitOption(usize),
    Advance,
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// Why a question resolved the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultReason {
    Correct,
    WrongSelection,
    /// The countdown ran out with nothing selected.
    TimedOut,
}

/// Outcome of the active question, visible until the next question is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub selected: Option<String>,
    pub correct_option: &'static str,
    pub reason: ResultReason,
}

impl AnswerResult {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.reason == ResultReason::Correct
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Multiple-choice quiz over the catalog with a per-question countdown.
///
/// `run_intent` mirrors the play/pause control. It stays on through a timeout
/// so the session auto-advances and keeps counting, and turns off when the
/// user answers.
pub struct QuizSession {
    catalog: Catalog,
    clock: Clock,
    rng: StdRng,
    timer: CountdownTimer,
    question: QuizQuestion,
    result: Option<AnswerResult>,
    score: ScoreTracker,
    run_intent: bool,
}

impl QuizSession {
    /// Creates an idle quiz with a first random question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` if the catalog has fewer than `OPTION_COUNT`
    /// grades, or `SessionError::Selector` if question generation fails.
    pub fn new(
        catalog: Catalog,
        settings: SessionSettings,
        clock: Clock,
    ) -> Result<Self, SessionError> {
        Self::with_rng(
            catalog,
            settings.duration(),
            clock,
            session_rng(settings.seed()),
        )
    }

    /// Same as [`QuizSession::new`] with an explicit random source.
    ///
    /// # Errors
    ///
    /// See [`QuizSession::new`].
    pub fn with_rng(
        catalog: Catalog,
        duration: TimerDuration,
        clock: Clock,
        mut rng: StdRng,
    ) -> Result<Self, SessionError> {
        if catalog.grades().len() < OPTION_COUNT {
            return Err(ConfigError::CatalogTooSmall {
                required: OPTION_COUNT,
                available: catalog.grades().len(),
            }
            .into());
        }

        let question = QuizQuestion::generate(&catalog, None, clock.now(), &mut rng)?;
        log::debug!("quiz starts with question {}", question.id());
        Ok(Self {
            catalog,
            clock,
            rng,
            timer: CountdownTimer::new(duration),
            question,
            result: None,
            score: ScoreTracker::new(),
            run_intent: false,
        })
    }

    #[must_use]
    pub fn question(&self) -> &QuizQuestion {
        &self.question
    }

    #[must_use]
    pub fn result(&self) -> Option<&AnswerResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn score(&self) -> &ScoreTracker {
        &self.score
    }

    #[must_use]
    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    #[must_use]
    pub fn run_intent(&self) -> bool {
        self.run_intent
    }

    /// Advancing is blocked only while an unanswered question is counting down.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        !(self.timer.is_running() && self.result.is_none())
    }

    /// A result is showing and play is on: the next question follows after the display delay.
    #[must_use]
    pub fn auto_advance_pending(&self) -> bool {
        self.run_intent && self.result.is_some()
    }

    /// Turns play on. The countdown only runs while no result is shown.
    pub fn start(&mut self) -> bool {
        let was_on = self.run_intent;
        self.run_intent = true;
        let started = self.result.is_none() && self.timer.start();
        !was_on || started
    }

    pub fn pause(&mut self) -> bool {
        let changed = self.run_intent || self.timer.is_running();
        self.run_intent = false;
        self.timer.pause();
        changed
    }

    /// Resolves the active question with `selected`.
    ///
    /// Returns `None` without touching the score if the question is already resolved.
    pub fn submit_answer(&mut self, selected: &str) -> Option<&AnswerResult> {
        if self.result.is_some() {
            log::debug!("answer ignored: question {} already resolved", self.question.id());
            return None;
        }

        let reason = if self.question.is_correct(selected) {
            ResultReason::Correct
        } else {
            ResultReason::WrongSelection
        };
        self.run_intent = false;
        self.timer.pause();
        self.resolve(Some(selected.to_owned()), reason)
    }

    /// Answers with the option at `index` (zero-based). Out-of-range indices are ignored.
    pub fn submit_option(&mut self, index: usize) -> Option<&AnswerResult> {
        let Some(option) = self.question.option(index) else {
            log::debug!("answer ignored: no option {index}");
            return None;
        };
        self.submit_answer(option)
    }

    /// Advances the countdown by one tick, resolving the question as a timeout on expiry.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.timer.tick();
        if outcome == TickOutcome::Expired {
            self.on_timer_expiry();
        }
        outcome
    }

    fn on_timer_expiry(&mut self) {
        if self.result.is_none() {
            self.resolve(None, ResultReason::TimedOut);
        }
    }

    fn resolve(&mut self, selected: Option<String>, reason: ResultReason) -> Option<&AnswerResult> {
        let result = AnswerResult {
            selected,
            correct_option: self.question.correct_option_text(),
            reason,
        };
        self.score.record_attempt(result.is_correct());
        log::debug!("question {} resolved: {:?}", self.question.id(), reason);
        self.result = Some(result);
        self.result.as_ref()
    }

    /// Moves to the next question. Returns `Ok(false)` while an unanswered question is counting down.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Selector` if question generation fails.
    pub fn advance(&mut self) -> Result<bool, SessionError> {
        if !self.can_advance() {
            log::debug!("advance ignored: question {} still running", self.question.id());
            return Ok(false);
        }
        self.next_question()?;
        if self.run_intent {
            self.timer.start();
        }
        Ok(true)
    }

    /// Stops play, draws a fresh question and zeroes the score.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Selector` if question generation fails.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.run_intent = false;
        self.next_question()?;
        self.score.reset();
        Ok(())
    }

    /// Stops play and refills the countdown with a new length.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` for a duration outside 5/10/15 seconds;
    /// the previous duration is kept.
    pub fn change_duration(&mut self, secs: u32) -> Result<(), SessionError> {
        let duration = TimerDuration::from_secs(secs)?;
        self.run_intent = false;
        self.timer.reset(duration);
        log::debug!("quiz duration set to {duration}");
        Ok(())
    }

    fn next_question(&mut self) -> Result<(), SessionError> {
        let exclude = Some(self.question.target_grade().rank());
        self.question =
            QuizQuestion::generate(&self.catalog, exclude, self.clock.now(), &mut self.rng)?;
        self.result = None;
        self.timer.reset(self.timer.duration());
        log::debug!("next question {}", self.question.id());
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            question: self.question.clone(),
            result: self.result.clone(),
            score: self.score,
            accuracy_percent: self.score.accuracy_percent(),
            timer: TimerSnapshot::from(&self.timer),
            run_intent: self.run_intent,
            can_advance: self.can_advance(),
        }
    }
}

impl TimedSession for QuizSession {
    type Command = QuizCommand;
    type Snapshot = QuizSnapshot;

    fn apply(&mut self, command: QuizCommand) -> Result<bool, SessionError> {
        match command {
            QuizCommand::Start => Ok(self.start()),
            QuizCommand::Pause => Ok(self.pause()),
            QuizCommand::Reset => self.reset().map(|()| true),
            QuizCommand::ChangeDuration(secs) => self.change_duration(secs).map(|()| true),
            QuizCommand::Submit(text) => Ok(self.submit_answer(&text).is_some()),
            QuizCommand::SubmitOption(index) => Ok(self.submit_option(index).is_some()),
            QuizCommand::Advance => self.advance(),
        }
    }

    fn tick(&mut self) -> Result<(), SessionError> {
        QuizSession::tick(self);
        Ok(())
    }

    fn is_ticking(&self) -> bool {
        self.timer.is_running()
    }

    fn auto_advance_pending(&self) -> bool {
        QuizSession::auto_advance_pending(self)
    }

    fn auto_advance(&mut self) -> Result<(), SessionError> {
        self.advance().map(|_| ())
    }

    fn snapshot(&self) -> QuizSnapshot {
        QuizSession::snapshot(self)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("question", self.question.id())
            .field("result", &self.result)
            .field("score", &self.score)
            .field("timer", &self.timer)
            .field("run_intent", &self.run_intent)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
