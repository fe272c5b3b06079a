//! Cooperative driver for timed sessions.
//!
//! Each session is owned by a single task. Commands, countdown ticks and the
//! quiz auto-advance are handled one at a time by that task, so they never
//! overlap. Any applied command re-arms the tick and auto-advance deadlines,
//! which drops whatever was scheduled against the previous state.

use std::fmt;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use kyu_core::time::{AUTO_ADVANCE_DELAY, TICK_INTERVAL};

use crate::error::SessionError;

/// A session the runner can drive.
pub trait TimedSession: Send + 'static {
    type Command: fmt::Debug + Send + 'static;
    type Snapshot: Clone + Send + Sync + 'static;

    /// Applies a user command. `Ok(false)` means it was ignored and nothing changed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the command is rejected.
    fn apply(&mut self, command: Self::Command) -> Result<bool, SessionError>;

    /// Handles one countdown tick.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if reacting to an expiry fails.
    fn tick(&mut self) -> Result<(), SessionError>;

    /// Whether the countdown is running and ticks should be scheduled.
    fn is_ticking(&self) -> bool;

    /// Whether an automatic advance should be scheduled.
    fn auto_advance_pending(&self) -> bool {
        false
    }

    /// Runs the automatic advance once its delay has elapsed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the advance fails.
    fn auto_advance(&mut self) -> Result<(), SessionError> {
        Ok(())
    }

    fn snapshot(&self) -> Self::Snapshot;
}

struct Envelope<C> {
    command: C,
    reply: oneshot::Sender<Result<bool, SessionError>>,
}

//
// ─── HANDLE ────────────────────────────────────────────────────────────────────
//

/// Owner-side handle of a spawned session.
///
/// Dropping the handle stops the session task and cancels any pending tick or
/// auto-advance.
pub struct SessionHandle<S: TimedSession> {
    commands: mpsc::UnboundedSender<Envelope<S::Command>>,
    snapshots: watch::Receiver<S::Snapshot>,
    task: Option<JoinHandle<()>>,
}

impl<S: TimedSession> SessionHandle<S> {
    /// Moves `session` onto a new task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(session: S) -> Self {
        let (commands, inbox) = mpsc::unbounded_channel();
        let (publisher, snapshots) = watch::channel(session.snapshot());
        let task = tokio::spawn(drive(session, inbox, publisher));
        Self {
            commands,
            snapshots,
            task: Some(task),
        }
    }

    /// Sends a command and waits until the session has applied it.
    ///
    /// Returns `Ok(false)` when the session ignored the command.
    ///
    /// # Errors
    ///
    /// Returns the session's rejection, or `SessionError::Closed` if the task has stopped.
    pub async fn send(&self, command: S::Command) -> Result<bool, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Envelope { command, reply })
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)?
    }

    /// Latest published state.
    #[must_use]
    pub fn snapshot(&self) -> S::Snapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<S::Snapshot> {
        self.snapshots.clone()
    }

    /// Stops the session task and waits for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl<S: TimedSession> Drop for SessionHandle<S> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl<S: TimedSession> fmt::Debug for SessionHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("closed", &self.commands.is_closed())
            .finish_non_exhaustive()
    }
}

//
// ─── EVENT LOOP ────────────────────────────────────────────────────────────────
//

async fn drive<S: TimedSession>(
    mut session: S,
    mut inbox: mpsc::UnboundedReceiver<Envelope<S::Command>>,
    publisher: watch::Sender<S::Snapshot>,
) {
    let mut next_tick = Instant::now() + TICK_INTERVAL;
    let mut advance_at: Option<Instant> = None;

    loop {
        if session.auto_advance_pending() {
            advance_at.get_or_insert_with(|| Instant::now() + AUTO_ADVANCE_DELAY);
        } else {
            advance_at = None;
        }
        let ticking = session.is_ticking();
        let advance_deadline = advance_at.unwrap_or(next_tick);

        tokio::select! {
            biased;

            envelope = inbox.recv() => {
                let Some(Envelope { command, reply }) = envelope else {
                    break;
                };
                log::debug!("command {command:?}");
                let result = session.apply(command);
                if matches!(result, Ok(true)) {
                    next_tick = Instant::now() + TICK_INTERVAL;
                    advance_at = None;
                    publisher.send_replace(session.snapshot());
                }
                if let Err(err) = &result {
                    log::warn!("command rejected: {err}");
                }
                let _ = reply.send(result);
            }

            () = sleep_until(next_tick), if ticking => {
                log::trace!("tick");
                if let Err(err) = session.tick() {
                    log::error!("tick failed: {err}");
                }
                next_tick = Instant::now() + TICK_INTERVAL;
                publisher.send_replace(session.snapshot());
            }

            () = sleep_until(advance_deadline), if advance_at.is_some() => {
                advance_at = None;
                log::debug!("auto-advance");
                if let Err(err) = session.auto_advance() {
                    log::error!("auto-advance failed: {err}");
                }
                next_tick = Instant::now() + TICK_INTERVAL;
                publisher.send_replace(session.snapshot());
            }
        }
    }

    log::debug!("session task finished");
}
