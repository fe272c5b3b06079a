//! Random grade selection.
//!
//! Both helpers take the random source as a parameter so callers can use a
//! seeded generator and get reproducible picks.

use rand::Rng;
use rand::seq::index;
use thiserror::Error;

use crate::model::{GradeRecord, Rank};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectorError {
    #[error("cannot pick from an empty catalog")]
    EmptyCatalog,

    #[error("requested {requested} distinct grades but only {available} are eligible")]
    NotEnoughCandidates { requested: usize, available: usize },
}

//
// ─── PICKING ───────────────────────────────────────────────────────────────────
//

/// Picks one grade uniformly at random, avoiding `exclude` when possible.
///
/// The excluded rank is filtered out only if at least one other grade remains,
/// so a single-entry catalog still yields its only grade.
///
/// # Errors
///
/// Returns `SelectorError::EmptyCatalog` if `grades` is empty.
pub fn pick_random<'a, R>(
    grades: &'a [GradeRecord],
    exclude: Option<Rank>,
    rng: &mut R,
) -> Result<&'a GradeRecord, SelectorError>
where
    R: Rng + ?Sized,
{
    if grades.is_empty() {
        return Err(SelectorError::EmptyCatalog);
    }

    let candidates: Vec<&GradeRecord> = match exclude {
        Some(rank) => grades.iter().filter(|g| g.rank() != rank).collect(),
        None => grades.iter().collect(),
    };
    let candidates = if candidates.is_empty() {
        grades.iter().collect()
    } else {
        candidates
    };

    let picked = candidates[rng.random_range(0..candidates.len())];
    log::trace!("picked rank {} (excluding {:?})", picked.rank(), exclude);
    Ok(picked)
}

/// Draws `count` distinct grades other than `exclude`, without replacement.
///
/// The returned order is random.
///
/// # Errors
///
/// Returns `SelectorError::NotEnoughCandidates` when fewer than `count` grades
/// remain after excluding `exclude`.
pub fn pick_distinct<'a, R>(
    grades: &'a [GradeRecord],
    exclude: Rank,
    count: usize,
    rng: &mut R,
) -> Result<Vec<&'a GradeRecord>, SelectorError>
where
    R: Rng + ?Sized,
{
    let candidates: Vec<&GradeRecord> = grades.iter().filter(|g| g.rank() != exclude).collect();
    if candidates.len() < count {
        return Err(SelectorError::NotEnoughCandidates {
            requested: count,
            available: candidates.len(),
        });
    }

    Ok(index::sample(rng, candidates.len(), count)
        .into_iter()
        .map(|i| candidates[i])
        .collect())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::KYU_GRADES;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn never_repeats_excluded_rank() {
        let mut rng = StdRng::seed_from_u64(42);
        for excluded in &KYU_GRADES {
            for _ in 0..1000 {
                let picked = pick_random(&KYU_GRADES, Some(excluded.rank()), &mut rng).unwrap();
                assert_ne!(picked.rank(), excluded.rank());
            }
        }
    }

    #[test]
    fn without_exclusion_every_grade_is_reachable() {
        let mut rng = StdRng::seed_from_u64(1);
        let seen: HashSet<_> = (0..1000)
            .map(|_| pick_random(&KYU_GRADES, None, &mut rng).unwrap().rank())
            .collect();
        assert_eq!(seen.len(), KYU_GRADES.len());
    }

    #[test]
    fn single_entry_catalog_ignores_exclusion() {
        let mut rng = StdRng::seed_from_u64(3);
        let only = &KYU_GRADES[..1];
        let picked = pick_random(only, Some(only[0].rank()), &mut rng).unwrap();
        assert_eq!(picked.rank(), only[0].rank());
    }

    #[test]
    fn empty_catalog_is_an_error() {
        let mut rng = StdRng::seed_from_u64(3);
        let err = pick_random(&KYU_GRADES[..0], None, &mut rng).unwrap_err();
        assert_eq!(err, SelectorError::EmptyCatalog);
    }

    #[test]
    fn same_seed_same_picks() {
        let mut a = StdRng::seed_from_u64(9);
        let mut b = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            let left = pick_random(&KYU_GRADES, None, &mut a).unwrap();
            let right = pick_random(&KYU_GRADES, None, &mut b).unwrap();
            assert_eq!(left, right);
        }
    }

    #[test]
    fn distinct_pick_has_no_duplicates_and_skips_exclusion() {
        let mut rng = StdRng::seed_from_u64(5);
        for target in &KYU_GRADES {
            for _ in 0..200 {
                let picked = pick_distinct(&KYU_GRADES, target.rank(), 3, &mut rng).unwrap();
                let ranks: HashSet<_> = picked.iter().map(|g| g.rank()).collect();
                assert_eq!(ranks.len(), 3);
                assert!(!ranks.contains(&target.rank()));
            }
        }
    }

    #[test]
    fn distinct_pick_reports_shortage() {
        let mut rng = StdRng::seed_from_u64(5);
        let err = pick_distinct(&KYU_GRADES[..3], KYU_GRADES[0].rank(), 3, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SelectorError::NotEnoughCandidates {
                requested: 3,
                available: 2
            }
        );
    }
}
