#![forbid(unsafe_code)]

pub mod model;
pub mod selector;
pub mod time;
pub mod timer;

pub use selector::SelectorError;
pub use time::Clock;
pub use timer::{CountdownTimer, TickOutcome, TimerState};
