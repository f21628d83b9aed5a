//! Facet search composition and topic utilities.
//!
//! # Responsibility
//! - Compose facet filters into ordered, paginated book pages.
//! - Expose the merged tag/category topic namespace, including uniform
//!   random sampling.
//!
//! # Invariants
//! - An empty facet intersection yields an empty page, never an error.
//! - Validation failures (`NoCategories`, `InvalidSampleSize`) surface
//!   directly instead of degrading to empty results.

use crate::repo::book_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod composer;
pub mod topics;

pub type SearchResult<T> = Result<T, SearchError>;

/// Search-layer error for facet composition and topic sampling.
#[derive(Debug)]
pub enum SearchError {
    /// Category search was invoked without any usable token.
    NoCategories,
    /// Random sampling was asked for an impossible sample size.
    InvalidSampleSize { requested: usize, universe: usize },
    Repo(RepoError),
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCategories => write!(f, "no categories found in request"),
            Self::InvalidSampleSize {
                requested,
                universe,
            } => write!(
                f,
                "cannot sample {requested} topics from a universe of {universe}"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for SearchError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
