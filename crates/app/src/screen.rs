use std::fmt::Write as _;

use serde::Serialize;

use services::{
    FlashcardCommand, FlashcardSession, FlashcardSnapshot, QuizCommand, QuizSession,
    QuizSnapshot, ResultReason, TimedSession, TimerSnapshot,
};

use crate::input::Input;

const BAR_WIDTH: usize = 20;

/// Terminal presentation of a session type.
pub trait Screen: TimedSession<Snapshot: Serialize> {
    /// Maps user input to a session command, `None` if the mode has no such control.
    fn command(input: Input) -> Option<Self::Command>;

    /// Coarse view of the snapshot; the text screen redraws only when it changes.
    fn render_key(snapshot: &Self::Snapshot) -> String;

    fn render(snapshot: &Self::Snapshot) -> String;
}

/// Remaining time with one decimal, never below `0.0s`.
#[must_use]
pub fn format_remaining(secs: f64) -> String {
    format!("{:.1}s", secs.max(0.0))
}

#[must_use]
pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = (progress.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn timer_line(timer: &TimerSnapshot) -> String {
    let state = if timer.is_running() { "▶" } else { "⏸" };
    format!(
        "{} {} {:>3}% {:>5} / {}s",
        state,
        progress_bar(timer.progress, BAR_WIDTH),
        (timer.progress.clamp(0.0, 1.0) * 100.0).round() as u32,
        format_remaining(timer.remaining_secs),
        timer.duration_secs
    )
}

fn whole_secs(timer: &TimerSnapshot) -> u32 {
    timer.remaining_secs.max(0.0).ceil() as u32
}

//
// ─── FLASHCARDS ────────────────────────────────────────────────────────────────
//

impl Screen for FlashcardSession {
    fn command(input: Input) -> Option<FlashcardCommand> {
        match input {
            Input::Play => Some(FlashcardCommand::Start),
            Input::Pause => Some(FlashcardCommand::Pause),
            Input::Reset => Some(FlashcardCommand::Reset),
            Input::Duration(secs) => Some(FlashcardCommand::ChangeDuration(secs)),
            _ => None,
        }
    }

    fn render_key(snapshot: &FlashcardSnapshot) -> String {
        format!(
            "{}|{:?}|{:?}|{}",
            snapshot.current.rank(),
            snapshot.previous.map(|g| g.rank()),
            snapshot.timer.state,
            whole_secs(&snapshot.timer)
        )
    }

    fn render(snapshot: &FlashcardSnapshot) -> String {
        let mut out = String::new();
        if let Some(previous) = &snapshot.previous {
            let _ = writeln!(
                out,
                "  Grade précédent : {} ({})",
                previous.display_name(),
                previous.description()
            );
        }
        let current = &snapshot.current;
        let stripe = if current.has_stripe() { " ▬" } else { "" };
        let _ = writeln!(
            out,
            "  {}  {}{}  [{}]",
            current.display_name(),
            current.description(),
            stripe,
            current.color().hex()
        );
        let _ = write!(out, "  {}", timer_line(&snapshot.timer));
        out
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

impl Screen for QuizSession {
    fn command(input: Input) -> Option<QuizCommand> {
        match input {
            Input::Play => Some(QuizCommand::Start),
            Input::Pause => Some(QuizCommand::Pause),
            Input::Reset => Some(QuizCommand::Reset),
            Input::Duration(secs) => Some(QuizCommand::ChangeDuration(secs)),
            Input::Next => Some(QuizCommand::Advance),
            Input::Option(index) => Some(QuizCommand::SubmitOption(index)),
            Input::Answer(text) => Some(QuizCommand::Submit(text)),
            Input::Help | Input::Quit => None,
        }
    }

    fn render_key(snapshot: &QuizSnapshot) -> String {
        format!(
            "{}|{}|{}|{}|{:?}|{}",
            snapshot.question.id(),
            snapshot.result.is_some(),
            snapshot.score.total_answered(),
            snapshot.run_intent,
            snapshot.timer.state,
            whole_secs(&snapshot.timer)
        )
    }

    fn render(snapshot: &QuizSnapshot) -> String {
        let mut out = String::new();
        let score = &snapshot.score;
        let _ = writeln!(
            out,
            "  Score {}/{} ({}%)  série {}  record {}",
            score.correct_count(),
            score.total_answered(),
            snapshot.accuracy_percent,
            score.current_streak(),
            score.best_streak()
        );
        let _ = writeln!(out, "  {}", snapshot.question.prompt_text());
        for (i, option) in snapshot.question.options().iter().enumerate() {
            let mark = match &snapshot.result {
                Some(result) if *option == result.correct_option => "✓",
                Some(result) if result.selected.as_deref() == Some(*option) => "✗",
                _ => " ",
            };
            let _ = writeln!(out, "  {mark} {}. {option}", i + 1);
        }
        if let Some(result) = &snapshot.result {
            let verdict = match result.reason {
                ResultReason::Correct => "Bonne réponse !".to_string(),
                ResultReason::WrongSelection => {
                    format!("Mauvaise réponse. Réponse : {}", result.correct_option)
                }
                ResultReason::TimedOut => {
                    format!("Temps écoulé ! Réponse : {}", result.correct_option)
                }
            };
            let _ = writeln!(out, "  {verdict}");
        }
        let _ = write!(out, "  {}", timer_line(&snapshot.timer));
        out
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use kyu_core::model::{Catalog, TimerDuration};
    use kyu_core::time::fixed_clock;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn remaining_is_never_negative() {
        assert_eq!(format_remaining(4.3), "4.3s");
        assert_eq!(format_remaining(0.0), "0.0s");
        assert_eq!(format_remaining(-0.05), "0.0s");
        assert_eq!(format_remaining(15.0), "15.0s");
    }

    #[test]
    fn progress_bar_is_clamped() {
        assert_eq!(progress_bar(1.0, 4), "[####]");
        assert_eq!(progress_bar(0.5, 4), "[##--]");
        assert_eq!(progress_bar(-1.0, 4), "[----]");
        assert_eq!(progress_bar(2.0, 4), "[####]");
    }

    #[test]
    fn flashcards_have_no_next_or_options() {
        assert_eq!(FlashcardSession::command(Input::Next), None);
        assert_eq!(FlashcardSession::command(Input::Option(0)), None);
        assert_eq!(
            FlashcardSession::command(Input::Duration(5)),
            Some(FlashcardCommand::ChangeDuration(5))
        );
    }

    #[test]
    fn quiz_maps_answers_and_advance() {
        assert_eq!(
            QuizSession::command(Input::Option(2)),
            Some(QuizCommand::SubmitOption(2))
        );
        assert_eq!(QuizSession::command(Input::Next), Some(QuizCommand::Advance));
        assert_eq!(QuizSession::command(Input::Quit), None);
    }

    #[test]
    fn quiz_render_marks_correct_and_selected() {
        let mut session =
            QuizSession::with_rng(Catalog::kyu(), TimerDuration::Ten, fixed_clock(), seeded(4))
                .unwrap();
        let wrong = session
            .question()
            .options()
            .iter()
            .copied()
            .find(|o| *o != session.question().correct_option_text())
            .unwrap();
        session.submit_answer(wrong);

        let text = QuizSession::render(&session.snapshot());
        assert!(text.contains("Mauvaise réponse"));
        assert!(text.contains('✗'));
        assert!(text.contains('✓'));
        assert!(text.contains("Score 0/1 (0%)"));
    }

    #[test]
    fn render_key_ignores_sub_second_changes() {
        let mut session =
            FlashcardSession::with_rng(Catalog::kyu(), TimerDuration::Five, seeded(4)).unwrap();
        session.start();
        let before = FlashcardSession::render_key(&session.snapshot());
        session.tick().unwrap();
        assert_eq!(before, FlashcardSession::render_key(&session.snapshot()));
        for _ in 0..9 {
            session.tick().unwrap();
        }
        assert_ne!(before, FlashcardSession::render_key(&session.snapshot()));
    }
}
