use rand::rngs::StdRng;
use std::fmt;

use kyu_core::model::{Catalog, GradeRecord, SessionSettings, TimerDuration};
use kyu_core::selector::pick_random;
use kyu_core::{CountdownTimer, TickOutcome};

use super::runner::TimedSession;
use super::session_rng;
use super::snapshot::{FlashcardSnapshot, TimerSnapshot};
use crate::error::SessionError;

/// Commands accepted by a running flashcard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashcardCommand {
    Start,
    Pause,
    /// Pause and show a different grade.
    Reset,
    ChangeDuration(u32),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Shows one random grade at a time and swaps it whenever the countdown runs out.
pub struct FlashcardSession {
    catalog: Catalog,
    rng: StdRng,
    timer: CountdownTimer,
    current: GradeRecord,
    previous: Option<GradeRecord>,
}

impl FlashcardSession {
    /// Creates an idle session showing a random grade.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Selector` if the catalog cannot supply a grade.
    pub fn new(catalog: Catalog, settings: SessionSettings) -> Result<Self, SessionError> {
        Self::with_rng(catalog, settings.duration(), session_rng(settings.seed()))
    }

    /// Same as [`FlashcardSession::new`] with an explicit random source.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Selector` if the catalog cannot supply a grade.
    pub fn with_rng(
        catalog: Catalog,
        duration: TimerDuration,
        mut rng: StdRng,
    ) -> Result<Self, SessionError> {
        let current = *pick_random(catalog.grades(), None, &mut rng)?;
        log::debug!("flashcards start on rank {} ({duration})", current.rank());
        Ok(Self {
            catalog,
            rng,
            timer: CountdownTimer::new(duration),
            current,
            previous: None,
        })
    }

    #[must_use]
    pub fn current(&self) -> &GradeRecord {
        &self.current
    }

    #[must_use]
    pub fn previous(&self) -> Option<&GradeRecord> {
        self.previous.as_ref()
    }

    #[must_use]
    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    /// Returns `false` if the countdown was already running.
    pub fn start(&mut self) -> bool {
        self.timer.start()
    }

    /// Returns `false` if the countdown was not running.
    pub fn pause(&mut self) -> bool {
        self.timer.pause()
    }

    /// The Reset control: pause, show a different grade and refill the countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Selector` if the catalog cannot supply a grade.
    pub fn manual_advance(&mut self) -> Result<(), SessionError> {
        self.timer.pause();
        self.rotate()?;
        self.timer.reset(self.timer.duration());
        Ok(())
    }

    /// Pauses and refills the countdown with a new length. The grade stays.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` for a duration outside 5/10/15 seconds;
    /// the previous duration is kept.
    pub fn change_duration(&mut self, secs: u32) -> Result<(), SessionError> {
        let duration = TimerDuration::from_secs(secs)?;
        self.set_duration(duration);
        Ok(())
    }

    pub fn set_duration(&mut self, duration: TimerDuration) {
        self.timer.reset(duration);
        log::debug!("flashcard duration set to {duration}");
    }

    /// Advances the countdown by one tick, rotating the grade on expiry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Selector` if the catalog cannot supply a grade.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        let outcome = self.timer.tick();
        if outcome == TickOutcome::Expired {
            self.on_expiry()?;
        }
        Ok(outcome)
    }

    fn on_expiry(&mut self) -> Result<(), SessionError> {
        self.rotate()?;
        // Expiry only happens while running, so keep running.
        self.timer.reset(self.timer.duration());
        self.timer.start();
        Ok(())
    }

    fn rotate(&mut self) -> Result<(), SessionError> {
        let next = *pick_random(
            self.catalog.grades(),
            Some(self.current.rank()),
            &mut self.rng,
        )?;
        log::debug!("flashcard {} -> {}", self.current.rank(), next.rank());
        self.previous = Some(std::mem::replace(&mut self.current, next));
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> FlashcardSnapshot {
        FlashcardSnapshot {
            current: self.current,
            previous: self.previous,
            timer: TimerSnapshot::from(&self.timer),
        }
    }
}

impl TimedSession for FlashcardSession {
    type Command = FlashcardCommand;
    type Snapshot = FlashcardSnapshot;

    fn apply(&mut self, command: FlashcardCommand) -> Result<bool, SessionError> {
        match command {
            FlashcardCommand::Start => Ok(self.start()),
            FlashcardCommand::Pause => Ok(self.pause()),
            FlashcardCommand::Reset => self.manual_advance().map(|()| true),
            FlashcardCommand::ChangeDuration(secs) => self.change_duration(secs).map(|()| true),
        }
    }

    fn tick(&mut self) -> Result<(), SessionError> {
        FlashcardSession::tick(self).map(|_| ())
    }

    fn is_ticking(&self) -> bool {
        self.timer.is_running()
    }

    fn snapshot(&self) -> FlashcardSnapshot {
        FlashcardSession::snapshot(self)
    }
}

impl fmt::Debug for FlashcardSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlashcardSession")
            .field("current", &self.current.rank())
            .field("previous", &self.previous.map(|g| g.rank()))
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
