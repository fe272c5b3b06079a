//! Countdown timer state machine.
//!
//! The timer does not own a clock. Whoever drives it calls [`CountdownTimer::tick`]
//! once per [`TICK_INTERVAL`](crate::time::TICK_INTERVAL) while it is running.
//! Remaining time is kept in whole tenths of a second so that a run of N ticks
//! reaches zero on exactly the N-th tick.

use serde::Serialize;

use crate::model::TimerDuration;
use crate::time::TENTHS_PER_TICK;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerState {
    Idle,
    Running,
    Expired,
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was not running; nothing changed.
    Ignored,
    /// Time was taken off and some remains.
    Counting,
    /// This tick reached zero. Reported once per run.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTimer {
    duration: TimerDuration,
    remaining_tenths: u32,
    state: TimerState,
}

impl CountdownTimer {
    /// Creates an idle timer holding the full `duration`.
    #[must_use]
    pub fn new(duration: TimerDuration) -> Self {
        Self {
            duration,
            remaining_tenths: full_tenths(duration),
            state: TimerState::Idle,
        }
    }

    /// Starts or resumes the countdown.
    ///
    /// An expired timer is refilled before it runs again. Returns `false` if it
    /// was already running.
    pub fn start(&mut self) -> bool {
        match self.state {
            TimerState::Running => false,
            TimerState::Idle => {
                self.state = TimerState::Running;
                true
            }
            TimerState::Expired => {
                self.remaining_tenths = full_tenths(self.duration);
                self.state = TimerState::Running;
                true
            }
        }
    }

    /// Stops the countdown, keeping the remaining time. Returns `false` if it was not running.
    pub fn pause(&mut self) -> bool {
        if self.state == TimerState::Running {
            self.state = TimerState::Idle;
            true
        } else {
            false
        }
    }

    /// Goes idle with a full countdown of `duration`.
    pub fn reset(&mut self, duration: TimerDuration) {
        self.duration = duration;
        self.remaining_tenths = full_tenths(duration);
        self.state = TimerState::Idle;
    }

    /// Takes one tick off a running timer.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != TimerState::Running {
            return TickOutcome::Ignored;
        }

        self.remaining_tenths = self.remaining_tenths.saturating_sub(TENTHS_PER_TICK);
        if self.remaining_tenths == 0 {
            self.state = TimerState::Expired;
            log::debug!("countdown of {} expired", self.duration);
            TickOutcome::Expired
        } else {
            TickOutcome::Counting
        }
    }

    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    #[must_use]
    pub fn duration(&self) -> TimerDuration {
        self.duration
    }

    /// Remaining time in seconds, `0.0 ..= duration`.
    #[must_use]
    pub fn remaining_secs(&self) -> f64 {
        f64::from(self.remaining_tenths) / 10.0
    }

    /// `remaining / duration`, clamped to `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let total = f64::from(full_tenths(self.duration));
        (f64::from(self.remaining_tenths) / total).clamp(0.0, 1.0)
    }
}

fn full_tenths(duration: TimerDuration) -> u32 {
    duration.secs() * 10
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
