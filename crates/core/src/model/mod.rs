mod duration;
mod grade;
mod question;
mod score;
mod settings;

pub use duration::{ConfigError, TimerDuration};
pub use grade::{BeltColor, Catalog, CatalogError, GradeRecord, KYU_GRADES, Rank};
pub use question::{OPTION_COUNT, QuestionDirection, QuestionId, QuizQuestion};
pub use score::ScoreTracker;
pub use settings::SessionSettings;
