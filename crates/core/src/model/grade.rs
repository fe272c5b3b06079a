use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog must contain at least one grade")]
    Empty,

    #[error("rank {0} appears more than once in the catalog")]
    DuplicateRank(u8),

    #[error("rank {0} is outside 1..=10")]
    RankOutOfRange(u8),
}

//
// ─── RANK ──────────────────────────────────────────────────────────────────────
//

/// Kyu level of a grade. Lower is more advanced.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rank(u8);

impl Rank {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// Creates a new `Rank`
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::RankOutOfRange` when `value` is not in `1..=10`.
    pub fn new(value: u8) -> Result<Self, CatalogError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CatalogError::RankOutOfRange(value))
        }
    }

    /// Returns the underlying u8 value
    #[must_use]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Debug for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rank({})", self.0)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Belt color as a `#RRGGBB` string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BeltColor(&'static str);

impl BeltColor {
    #[must_use]
    pub const fn hex(&self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for BeltColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BeltColor({})", self.0)
    }
}

//
// ─── GRADE RECORD ──────────────────────────────────────────────────────────────
//

/// One belt grade. Immutable; all instances live in [`KYU_GRADES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    rank: Rank,
    display_name: &'static str,
    description: &'static str,
    color: BeltColor,
    has_stripe: bool,
}

impl GradeRecord {
    const fn fixed(
        rank: u8,
        display_name: &'static str,
        description: &'static str,
        color: &'static str,
        has_stripe: bool,
    ) -> Self {
        Self {
            rank: Rank(rank),
            display_name,
            description,
            color: BeltColor(color),
            has_stripe,
        }
    }

    #[must_use]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    #[must_use]
    pub fn display_name(&self) -> &'static str {
        self.display_name
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        self.description
    }

    #[must_use]
    pub fn color(&self) -> BeltColor {
        self.color
    }

    /// Presentation hint: the belt carries a stripe.
    #[must_use]
    pub fn has_stripe(&self) -> bool {
        self.has_stripe
    }
}

const BROWN: &str = "#8B4513";
const GREEN: &str = "#228B22";
const YELLOW: &str = "#FFD700";
const BLUE: &str = "#4169E1";
const ORANGE: &str = "#FF8C00";

/// The ten kyu grades, most advanced first.
pub static KYU_GRADES: [GradeRecord; 10] = [
    GradeRecord::fixed(1, "1er kyu", "Ceinture marron + barrette", BROWN, true),
    GradeRecord::fixed(2, "2ème kyu", "Ceinture marron", BROWN, false),
    GradeRecord::fixed(3, "3ème kyu", "Ceinture verte + barrette", GREEN, true),
    GradeRecord::fixed(4, "4ème kyu", "Ceinture verte", GREEN, false),
    GradeRecord::fixed(5, "5ème kyu", "Ceinture jaune + barrette", YELLOW, true),
    GradeRecord::fixed(6, "6ème kyu", "Ceinture jaune", YELLOW, false),
    GradeRecord::fixed(7, "7ème kyu", "Ceinture bleu + barrette", BLUE, true),
    GradeRecord::fixed(8, "8ème kyu", "Ceinture bleu", BLUE, false),
    GradeRecord::fixed(9, "9ème kyu", "Ceinture orange + barrette", ORANGE, true),
    GradeRecord::fixed(10, "10ème kyu", "Ceinture orange", ORANGE, false),
];

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Validated, ordered view over a set of grades.
///
/// Guarantees at least one entry and unique ranks. Sessions hold one of these
/// instead of a raw slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catalog {
    grades: &'static [GradeRecord],
}

impl Catalog {
    /// The built-in kyu catalog.
    #[must_use]
    pub fn kyu() -> Self {
        Self {
            grades: &KYU_GRADES,
        }
    }

    /// Wraps a custom grade table.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Empty` for an empty table and
    /// `CatalogError::DuplicateRank` if two grades share a rank.
    pub fn new(grades: &'static [GradeRecord]) -> Result<Self, CatalogError> {
        if grades.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut seen = HashSet::with_capacity(grades.len());
        for grade in grades {
            if !seen.insert(grade.rank()) {
                return Err(CatalogError::DuplicateRank(grade.rank().value()));
            }
        }
        Ok(Self { grades })
    }

    #[must_use]
    pub fn grades(&self) -> &'static [GradeRecord] {
        self.grades
    }

    #[must_use]
    pub fn by_rank(&self, rank: Rank) -> Option<&'static GradeRecord> {
        self.grades.iter().find(|g| g.rank() == rank)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::kyu()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kyu_catalog_has_each_rank_once() {
        let catalog = Catalog::kyu();
        assert_eq!(catalog.grades().len(), 10);
        let mut ranks: Vec<u8> = catalog.grades().iter().map(|g| g.rank().value()).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn names_and_descriptions_are_unique() {
        let names: HashSet<_> = KYU_GRADES.iter().map(GradeRecord::display_name).collect();
        let descriptions: HashSet<_> = KYU_GRADES.iter().map(GradeRecord::description).collect();
        assert_eq!(names.len(), KYU_GRADES.len());
        assert_eq!(descriptions.len(), KYU_GRADES.len());
    }

    #[test]
    fn rank_three_is_green_with_stripe() {
        let grade = Catalog::kyu().by_rank(Rank::new(3).unwrap()).unwrap();
        assert_eq!(grade.display_name(), "3ème kyu");
        assert_eq!(grade.description(), "Ceinture verte + barrette");
        assert_eq!(grade.color().hex(), "#228B22");
        assert!(grade.has_stripe());
    }

    #[test]
    fn rank_rejects_out_of_range() {
        assert_eq!(Rank::new(0), Err(CatalogError::RankOutOfRange(0)));
        assert_eq!(Rank::new(11), Err(CatalogError::RankOutOfRange(11)));
        assert_eq!(Rank::new(10).unwrap().value(), 10);
    }

    #[test]
    fn catalog_rejects_empty_and_duplicates() {
        static EMPTY: [GradeRecord; 0] = [];
        static DUPES: [GradeRecord; 2] = [
            GradeRecord::fixed(1, "a", "x", BROWN, false),
            GradeRecord::fixed(1, "b", "y", BROWN, false),
        ];
        assert_eq!(Catalog::new(&EMPTY), Err(CatalogError::Empty));
        assert_eq!(Catalog::new(&DUPES), Err(CatalogError::DuplicateRank(1)));
    }

    #[test]
    fn grade_serializes_with_camel_case_fields() {
        let value = serde_json::to_value(KYU_GRADES[0]).unwrap();
        assert_eq!(value["rank"], 1);
        assert_eq!(value["displayName"], "1er kyu");
        assert_eq!(value["hasStripe"], true);
        assert_eq!(value["color"], "#8B4513");
    }
}
