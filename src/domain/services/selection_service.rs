//! Selection service - fair pick of the next movie for a party
//!
//! A contributor is drawn uniformly from everyone with an unwatched movie,
//! then one of that contributor's unwatched movies is drawn uniformly.
//! Each person gets the same chance regardless of how many movies they added.

use std::collections::BTreeSet;

use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::domain::repositories::SelectionCandidate;

/// Build the RNG used for selection; a seed makes picks reproducible
pub fn selection_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Distinct contributors among the candidates, in ascending id order
pub fn contributors(candidates: &[SelectionCandidate]) -> BTreeSet<i64> {
    candidates.iter().map(|c| c.added_by).collect()
}

/// Pick one contributor uniformly at random
pub fn pick_contributor<R: Rng + ?Sized>(
    candidates: &[SelectionCandidate],
    rng: &mut R,
) -> Option<i64> {
    contributors(candidates).into_iter().choose(rng)
}

/// Pick one of the contributor's movies uniformly at random
pub fn pick_movie_for_contributor<R: Rng + ?Sized>(
    candidates: &[SelectionCandidate],
    contributor: i64,
    rng: &mut R,
) -> Option<SelectionCandidate> {
    let movies: Vec<&SelectionCandidate> = candidates
        .iter()
        .filter(|c| c.added_by == contributor)
        .collect();
    movies.choose(rng).map(|c| **c)
}

/// Two-stage pick: contributor first, then one of their movies.
/// Returns `None` when there are no candidates.
pub fn pick_fair<R: Rng + ?Sized>(
    candidates: &[SelectionCandidate],
    rng: &mut R,
) -> Option<SelectionCandidate> {
    let contributor = pick_contributor(candidates, rng)?;
    pick_movie_for_contributor(candidates, contributor, rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMBER_A: i64 = 1;
    const MEMBER_B: i64 = 2;

    fn candidates(per_member: &[(i64, usize)]) -> Vec<SelectionCandidate> {
        let mut movie_id = 0;
        let mut out = Vec::new();
        for &(member, count) in per_member {
            for _ in 0..count {
                movie_id += 1;
                out.push(SelectionCandidate {
                    movie_id,
                    added_by: member,
                });
            }
        }
        out
    }

    #[test]
    fn test_no_candidates_picks_nothing() {
        let mut rng = selection_rng(Some(1));
        assert_eq!(pick_fair(&[], &mut rng), None);
    }

    #[test]
    fn test_single_candidate_is_always_picked() {
        let pool = candidates(&[(MEMBER_A, 1)]);
        let mut rng = selection_rng(Some(3));
        for _ in 0..20 {
            assert_eq!(pick_fair(&pool, &mut rng), Some(pool[0]));
        }
    }

    #[test]
    fn test_contributors_are_distinct() {
        let pool = candidates(&[(MEMBER_A, 3), (MEMBER_B, 2)]);
        let set = contributors(&pool);
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![MEMBER_A, MEMBER_B]);
    }

    #[test]
    fn test_pick_stays_within_contributor() {
        let pool = candidates(&[(MEMBER_A, 4), (MEMBER_B, 4)]);
        let mut rng = selection_rng(Some(11));
        for _ in 0..50 {
            let pick = pick_movie_for_contributor(&pool, MEMBER_B, &mut rng).unwrap();
            assert_eq!(pick.added_by, MEMBER_B);
        }
        assert_eq!(pick_movie_for_contributor(&pool, 99, &mut rng), None);
    }

    #[test]
    fn test_fairness_is_per_contributor_not_per_movie() {
        // A added 10 movies, B added 1. A per-movie pick would favour A ~91%.
        let pool = candidates(&[(MEMBER_A, 10), (MEMBER_B, 1)]);
        let mut rng = selection_rng(Some(42));

        let trials = 10_000;
        let picked_a = (0..trials)
            .filter(|_| pick_fair(&pool, &mut rng).unwrap().added_by == MEMBER_A)
            .count();

        let share = picked_a as f64 / trials as f64;
        assert!((0.46..=0.54).contains(&share), "share of A picks was {share}");
    }

    #[test]
    fn test_every_movie_of_a_contributor_is_reachable() {
        let pool = candidates(&[(MEMBER_A, 3), (MEMBER_B, 1)]);
        let mut rng = selection_rng(Some(5));
        let mut seen = BTreeSet::new();
        for _ in 0..500 {
            seen.insert(pick_fair(&pool, &mut rng).unwrap().movie_id);
        }
        assert_eq!(seen.len(), pool.len());
    }
}
