mod input;
mod screen;

use std::fmt;

use kyu_core::Clock;
use kyu_core::model::{Catalog, SessionSettings, TimerDuration};
use services::{FlashcardSession, QuizSession, SessionError, SessionHandle};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::input::{HELP, Input, parse_input};
use crate::screen::Screen;

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDuration { raw: String },
    InvalidSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDuration { raw } => {
                write!(f, "invalid --duration value: {raw} (expected 5, 10 or 15)")
            }
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- flashcards [--duration <5|10|15>] [--seed <n>] [--json]");
    eprintln!("  cargo run -p app -- quiz       [--duration <5|10|15>] [--seed <n>] [--json]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  flashcards, --duration 10, random seed");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  KYU_DURATION, KYU_SEED, RUST_LOG");
    eprintln!();
    eprintln!("{HELP}");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Flashcards,
    Quiz,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "flashcards" | "cards" => Some(Self::Flashcards),
            "quiz" => Some(Self::Quiz),
            _ => None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    settings: SessionSettings,
    json: bool,
}

impl Args {
    /// Parses flags on top of environment values.
    ///
    /// `env` is the variable lookup, `std::env::var` outside tests.
    fn parse(
        args: &mut impl Iterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut duration = match env("KYU_DURATION") {
            Some(raw) => parse_duration(raw)?,
            None => TimerDuration::default(),
        };
        let mut seed = match env("KYU_SEED") {
            Some(raw) => Some(parse_seed(raw)?),
            None => None,
        };
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--duration" => duration = parse_duration(require_value(args, "--duration")?)?,
                "--seed" => seed = Some(parse_seed(require_value(args, "--seed")?)?),
                "--json" => json = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let settings = SessionSettings::default().with_duration(duration);
        let settings = match seed {
            Some(seed) => settings.with_seed(seed),
            None => settings,
        };
        Ok(Self { settings, json })
    }
}

fn parse_duration(raw: String) -> Result<TimerDuration, ArgsError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .and_then(|secs| TimerDuration::from_secs(secs).ok())
        .ok_or(ArgsError::InvalidDuration { raw })
}

fn parse_seed(raw: String) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidSeed { raw })
}

/// Reads commands from stdin and prints the session until EOF or `quit`.
async fn run_session<S: Screen>(
    handle: SessionHandle<S>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut changes = handle.subscribe();
    let mut last_key = None;

    loop {
        let snapshot = changes.borrow_and_update().clone();
        if json {
            println!("{}", serde_json::to_string(&snapshot)?);
        } else {
            let key = S::render_key(&snapshot);
            if last_key.as_ref() != Some(&key) {
                println!("{}\n", S::render(&snapshot));
                last_key = Some(key);
            }
        }

        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let input = match parse_input(&line) {
                    Ok(Input::Quit) => break,
                    Ok(Input::Help) => {
                        eprintln!("{HELP}");
                        continue;
                    }
                    Ok(input) => input,
                    Err(err) => {
                        eprintln!("{err} (type `help` for commands)");
                        continue;
                    }
                };
                let Some(command) = S::command(input) else {
                    eprintln!("not available in this mode");
                    continue;
                };
                match handle.send(command).await {
                    Ok(true) => {}
                    Ok(false) => log::info!("command ignored"),
                    Err(SessionError::Closed) => break,
                    Err(err) => eprintln!("{err}"),
                }
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: flashcards when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Flashcards,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Flashcards,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter, |key| std::env::var(key).ok()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    log::debug!("starting {cmd:?} with {:?}", parsed.settings);

    let catalog = Catalog::kyu();
    match cmd {
        Command::Flashcards => {
            let session = FlashcardSession::new(catalog, parsed.settings)?;
            run_session(SessionHandle::spawn(session), parsed.json).await
        }
        Command::Quiz => {
            let session = QuizSession::new(catalog, parsed.settings, Clock::system())?;
            run_session(SessionHandle::spawn(session), parsed.json).await
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
