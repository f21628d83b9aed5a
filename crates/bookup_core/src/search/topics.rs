//! Topic namespace utilities: listing, contains-search and sampling.
//!
//! # Responsibility
//! - Expose the merged category/tag name space as "topics".
//! - Draw uniform random topic samples without replacement.
//!
//! # Invariants
//! - One RNG instance serves one sampling call; draws never repeat a
//!   position.
//! - Sample results keep draw order, not sorted order.
//! - Out-of-range sample sizes are client errors, not clamped.

use crate::repo::book_repo::BookRepository;
use crate::search::{SearchError, SearchResult};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

/// Default result cap for topic contains-search.
pub const DEFAULT_TOPIC_SEARCH_TAKE: u32 = 6;

/// Lists every distinct topic name, ordered case-insensitively.
pub fn all_topic_names<R: BookRepository>(repo: &R) -> SearchResult<Vec<String>> {
    Ok(repo.topic_names()?)
}

/// Finds topic names containing the fragment, case-insensitively.
///
/// A blank fragment matches everything up to the cap; `take` defaults to
/// [`DEFAULT_TOPIC_SEARCH_TAKE`].
pub fn search_topic_names<R: BookRepository>(
    repo: &R,
    predicate: &str,
    take: Option<u32>,
) -> SearchResult<Vec<String>> {
    let applied_take = take.unwrap_or(DEFAULT_TOPIC_SEARCH_TAKE);
    Ok(repo.search_topic_names(predicate, applied_take)?)
}

/// Draws `n` distinct topic names uniformly at random.
pub fn random_topics<R: BookRepository>(repo: &R, n: usize) -> SearchResult<Vec<String>> {
    let names = repo.topic_names()?;
    let universe = names.len();
    let sampled = sample_topics(names, n, &mut rand::thread_rng())?;
    debug!(
        "event=topic_sample module=search status=ok requested={n} universe={universe}"
    );
    Ok(sampled)
}

/// Uniform without-replacement sample over an owned name vector.
///
/// Split out from [`random_topics`] so tests can drive it with a seeded RNG.
/// Uses a partial shuffle, so every draw excludes previously chosen
/// positions and the call terminates regardless of universe size.
pub fn sample_topics<G: Rng>(
    mut names: Vec<String>,
    n: usize,
    rng: &mut G,
) -> SearchResult<Vec<String>> {
    let universe = names.len();
    if n < 1 || n > universe {
        return Err(SearchError::InvalidSampleSize {
            requested: n,
            universe,
        });
    }

    let (sampled, _) = names.partial_shuffle(rng, n);
    Ok(sampled.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn universe(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn sample_returns_exactly_n_distinct_members() {
        let names = universe(&["history", "sci-fi", "poetry", "drama", "essays"]);
        let mut rng = StdRng::seed_from_u64(7);

        let sampled = sample_topics(names.clone(), 3, &mut rng).expect("sample should succeed");
        assert_eq!(sampled.len(), 3);
        for name in &sampled {
            assert!(names.contains(name), "sampled unknown topic {name}");
        }

        let mut unique = sampled.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 3, "sample contains duplicates");
    }

    #[test]
    fn full_universe_sample_is_a_permutation() {
        let names = universe(&["a11", "b22", "c33"]);
        let mut rng = StdRng::seed_from_u64(21);

        let mut sampled =
            sample_topics(names.clone(), 3, &mut rng).expect("sample should succeed");
        sampled.sort();
        let mut expected = names;
        expected.sort();
        assert_eq!(sampled, expected);
    }

    #[test]
    fn sample_is_deterministic_under_a_seeded_rng() {
        let names = universe(&["history", "sci-fi", "poetry", "drama", "essays"]);

        let mut first_rng = StdRng::seed_from_u64(42);
        let mut second_rng = StdRng::seed_from_u64(42);
        let first = sample_topics(names.clone(), 4, &mut first_rng).expect("sample");
        let second = sample_topics(names, 4, &mut second_rng).expect("sample");
        assert_eq!(first, second);
    }

    #[test]
    fn out_of_range_sample_sizes_are_rejected() {
        let names = universe(&["history", "sci-fi"]);
        let mut rng = StdRng::seed_from_u64(3);

        let too_small = sample_topics(names.clone(), 0, &mut rng)
            .expect_err("zero draws must be rejected");
        assert!(matches!(
            too_small,
            SearchError::InvalidSampleSize {
                requested: 0,
                universe: 2
            }
        ));

        let too_large = sample_topics(names, 3, &mut rng)
            .expect_err("oversized sample must be rejected");
        assert!(matches!(
            too_large,
            SearchError::InvalidSampleSize {
                requested: 3,
                universe: 2
            }
        ));
    }

    #[test]
    fn empty_universe_rejects_every_sample_size() {
        let mut rng = StdRng::seed_from_u64(9);
        let err = sample_topics(Vec::new(), 1, &mut rng)
            .expect_err("sampling from nothing must fail");
        assert!(matches!(
            err,
            SearchError::InvalidSampleSize {
                requested: 1,
                universe: 0
            }
        ));
    }
}
