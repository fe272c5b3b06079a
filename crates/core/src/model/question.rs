use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::fmt;

use crate::model::grade::{Catalog, GradeRecord, Rank};
use crate::selector::{SelectorError, pick_distinct, pick_random};

/// Number of options offered per question (one correct, the rest distractors).
pub const OPTION_COUNT: usize = 4;

//
// ─── DIRECTION ─────────────────────────────────────────────────────────────────
//

/// What the question shows and what it asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QuestionDirection {
    /// Shows the grade name, asks for the belt description.
    #[serde(rename = "kyuToDescription")]
    NameToDescription,
    /// Shows the belt description, asks for the grade name.
    #[serde(rename = "descriptionToKyu")]
    DescriptionToName,
}

impl QuestionDirection {
    #[must_use]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Self::NameToDescription
        } else {
            Self::DescriptionToName
        }
    }

    /// The text of `grade` that answers a question in this direction.
    #[must_use]
    pub fn answer_for(self, grade: &GradeRecord) -> &'static str {
        match self {
            Self::NameToDescription => grade.description(),
            Self::DescriptionToName => grade.display_name(),
        }
    }

    #[must_use]
    pub fn prompt_for(self, grade: &GradeRecord) -> String {
        match self {
            Self::NameToDescription => {
                format!("Quelle est la description du {} ?", grade.display_name())
            }
            Self::DescriptionToName => {
                format!("Quel grade correspond à \"{}\" ?", grade.description())
            }
        }
    }

    fn slug(self) -> &'static str {
        match self {
            Self::NameToDescription => "kyuToDescription",
            Self::DescriptionToName => "descriptionToKyu",
        }
    }
}

//
// ─── QUESTION ID ───────────────────────────────────────────────────────────────
//

/// Identifier of the form `{rank}-{direction}-{unix millis}`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    #[must_use]
    pub fn new(rank: Rank, direction: QuestionDirection, created_at: DateTime<Utc>) -> Self {
        Self(format!(
            "{}-{}-{}",
            rank,
            direction.slug(),
            created_at.timestamp_millis()
        ))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//
// ─── QUIZ QUESTION ─────────────────────────────────────────────────────────────
//

/// A multiple-choice question about one grade.
///
/// Option order is shuffled once at construction and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    id: QuestionId,
    target_grade: GradeRecord,
    direction: QuestionDirection,
    prompt_text: String,
    correct_option_text: &'static str,
    options: Vec<&'static str>,
}

impl QuizQuestion {
    /// Picks a target grade (avoiding `exclude`) and a random direction, then builds the question.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError` if the catalog cannot supply a target and
    /// `OPTION_COUNT - 1` distractors.
    pub fn generate<R>(
        catalog: &Catalog,
        exclude: Option<Rank>,
        created_at: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Self, SelectorError>
    where
        R: Rng + ?Sized,
    {
        let target = pick_random(catalog.grades(), exclude, rng)?;
        let direction = QuestionDirection::random(rng);
        Self::with_direction(catalog, target, direction, created_at, rng)
    }

    /// Builds a question about `target` in a fixed direction.
    ///
    /// # Errors
    ///
    /// Returns `SelectorError::NotEnoughCandidates` if the catalog has fewer than
    /// `OPTION_COUNT - 1` other grades.
    pub fn with_direction<R>(
        catalog: &Catalog,
        target: &GradeRecord,
        direction: QuestionDirection,
        created_at: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<Self, SelectorError>
    where
        R: Rng + ?Sized,
    {
        let correct = direction.answer_for(target);
        let distractors = pick_distinct(catalog.grades(), target.rank(), OPTION_COUNT - 1, rng)?;

        let mut options = Vec::with_capacity(OPTION_COUNT);
        options.push(correct);
        options.extend(distractors.into_iter().map(|g| direction.answer_for(g)));
        options.shuffle(rng);

        Ok(Self {
            id: QuestionId::new(target.rank(), direction, created_at),
            target_grade: *target,
            direction,
            prompt_text: direction.prompt_for(target),
            correct_option_text: correct,
            options,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn target_grade(&self) -> &GradeRecord {
        &self.target_grade
    }

    #[must_use]
    pub fn direction(&self) -> QuestionDirection {
        self.direction
    }

    #[must_use]
    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    #[must_use]
    pub fn correct_option_text(&self) -> &'static str {
        self.correct_option_text
    }

    #[must_use]
    pub fn options(&self) -> &[&'static str] {
        &self.options
    }

    /// Option text by zero-based position.
    #[must_use]
    pub fn option(&self, index: usize) -> Option<&'static str> {
        self.options.get(index).copied()
    }

    #[must_use]
    pub fn is_correct(&self, selected: &str) -> bool {
        selected == self.correct_option_text
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn name_to_description_for_rank_three() {
        let catalog = Catalog::kyu();
        let target = catalog.by_rank(Rank::new(3).unwrap()).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        let question = QuizQuestion::with_direction(
            &catalog,
            target,
            QuestionDirection::NameToDescription,
            fixed_now(),
            &mut rng,
        )
        .unwrap();

        assert!(question.prompt_text().contains("3ème kyu"));
        assert_eq!(question.correct_option_text(), "Ceinture verte + barrette");
        assert!(question.options().contains(&"Ceinture verte + barrette"));
    }

    #[test]
    fn description_to_name_asks_for_the_name() {
        let catalog = Catalog::kyu();
        let target = catalog.by_rank(Rank::new(8).unwrap()).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        let question = QuizQuestion::with_direction(
            &catalog,
            target,
            QuestionDirection::DescriptionToName,
            fixed_now(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(question.prompt_text(), "Quel grade correspond à \"Ceinture bleu\" ?");
        assert_eq!(question.correct_option_text(), "8ème kyu");
        assert!(question.is_correct("8ème kyu"));
        assert!(!question.is_correct("Ceinture bleu"));
    }

    #[test]
    fn generated_questions_have_four_distinct_options() {
        let catalog = Catalog::kyu();
        let mut rng = StdRng::seed_from_u64(2024);
        let mut previous = None;
        for _ in 0..1000 {
            let question = QuizQuestion::generate(&catalog, previous, fixed_now(), &mut rng).unwrap();
            let distinct: HashSet<_> = question.options().iter().collect();
            assert_eq!(question.options().len(), OPTION_COUNT);
            assert_eq!(distinct.len(), OPTION_COUNT);
            assert!(question.options().contains(&question.correct_option_text()));
            if let Some(rank) = previous {
                assert_ne!(question.target_grade().rank(), rank);
            }
            previous = Some(question.target_grade().rank());
        }
    }

    #[test]
    fn options_follow_the_direction() {
        let catalog = Catalog::kyu();
        let mut rng = StdRng::seed_from_u64(77);
        for _ in 0..200 {
            let question = QuizQuestion::generate(&catalog, None, fixed_now(), &mut rng).unwrap();
            let pool: Vec<&str> = catalog
                .grades()
                .iter()
                .map(|g| question.direction().answer_for(g))
                .collect();
            assert!(question.options().iter().all(|o| pool.contains(o)));
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let catalog = Catalog::kyu();
        let mut a = StdRng::seed_from_u64(3);
        let mut b = StdRng::seed_from_u64(3);
        let left = QuizQuestion::generate(&catalog, None, fixed_now(), &mut a).unwrap();
        let right = QuizQuestion::generate(&catalog, None, fixed_now(), &mut b).unwrap();
        assert_eq!(left, right);
    }

    #[test]
    fn id_encodes_rank_direction_and_time() {
        let rank = Rank::new(4).unwrap();
        let id = QuestionId::new(rank, QuestionDirection::DescriptionToName, fixed_now());
        assert_eq!(id.as_str(), "4-descriptionToKyu-1700000000000");
    }

    #[test]
    fn too_small_catalog_cannot_supply_distractors() {
        let catalog = Catalog::new(&crate::model::KYU_GRADES[..3]).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let err = QuizQuestion::generate(&catalog, None, fixed_now(), &mut rng).unwrap_err();
        assert!(matches!(err, SelectorError::NotEnoughCandidates { .. }));
    }
}
