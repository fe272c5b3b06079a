use std::fmt;

use kyu_core::model::OPTION_COUNT;

/// One line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Play,
    Pause,
    Reset,
    Duration(u32),
    Next,
    /// Zero-based option position.
    Option(usize),
    Answer(String),
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    Empty,
    Unknown(String),
    MissingValue(&'static str),
    InvalidNumber(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Empty => write!(f, "empty command"),
            InputError::Unknown(raw) => write!(f, "unknown command: {raw}"),
            InputError::MissingValue(cmd) => write!(f, "{cmd} requires a value"),
            InputError::InvalidNumber(raw) => write!(f, "not a number: {raw}"),
        }
    }
}

impl std::error::Error for InputError {}

pub const HELP: &str = "commands: play | pause | reset | duration <5|10|15> | next | 1-4 | answer <text> | quit";

/// Parses a command line. Bare numbers select an option (1-based).
///
/// # Errors
///
/// Returns `InputError` for empty, unknown or malformed input.
pub fn parse_input(line: &str) -> Result<Input, InputError> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    match word.to_lowercase().as_str() {
        "" => Err(InputError::Empty),
        "play" | "p" | "start" => Ok(Input::Play),
        "pause" | "stop" => Ok(Input::Pause),
        "reset" | "r" => Ok(Input::Reset),
        "next" | "n" => Ok(Input::Next),
        "help" | "h" | "?" => Ok(Input::Help),
        "quit" | "q" | "exit" => Ok(Input::Quit),
        "duration" | "d" => {
            if rest.is_empty() {
                return Err(InputError::MissingValue("duration"));
            }
            rest.parse()
                .map(Input::Duration)
                .map_err(|_| InputError::InvalidNumber(rest.to_string()))
        }
        "answer" | "a" => {
            if rest.is_empty() {
                Err(InputError::MissingValue("answer"))
            } else {
                Ok(Input::Answer(rest.to_string()))
            }
        }
        other => match other.parse::<usize>() {
            Ok(n) if (1..=OPTION_COUNT).contains(&n) => Ok(Input::Option(n - 1)),
            Ok(_) => Err(InputError::InvalidNumber(other.to_string())),
            Err(_) => Err(InputError::Unknown(line.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_controls() {
        assert_eq!(parse_input("play"), Ok(Input::Play));
        assert_eq!(parse_input("  PAUSE "), Ok(Input::Pause));
        assert_eq!(parse_input("reset"), Ok(Input::Reset));
        assert_eq!(parse_input("n"), Ok(Input::Next));
        assert_eq!(parse_input("q"), Ok(Input::Quit));
    }

    #[test]
    fn parses_duration() {
        assert_eq!(parse_input("duration 15"), Ok(Input::Duration(15)));
        assert_eq!(parse_input("d 7"), Ok(Input::Duration(7)));
        assert_eq!(
            parse_input("duration"),
            Err(InputError::MissingValue("duration"))
        );
        assert_eq!(
            parse_input("duration ten"),
            Err(InputError::InvalidNumber("ten".into()))
        );
    }

    #[test]
    fn numbers_select_options_one_based() {
        assert_eq!(parse_input("1"), Ok(Input::Option(0)));
        assert_eq!(parse_input("4"), Ok(Input::Option(3)));
        assert_eq!(parse_input("5"), Err(InputError::InvalidNumber("5".into())));
        assert_eq!(parse_input("0"), Err(InputError::InvalidNumber("0".into())));
    }

    #[test]
    fn answer_keeps_the_full_text() {
        assert_eq!(
            parse_input("answer Ceinture verte + barrette"),
            Ok(Input::Answer("Ceinture verte + barrette".into()))
        );
        assert_eq!(parse_input("a"), Err(InputError::MissingValue("answer")));
    }

    #[test]
    fn rejects_empty_and_unknown() {
        assert_eq!(parse_input("   "), Err(InputError::Empty));
        assert_eq!(
            parse_input("jump now"),
            Err(InputError::Unknown("jump now".into()))
        );
    }
}
