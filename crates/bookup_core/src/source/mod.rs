//! External bibliographic source boundary.
//!
//! # Responsibility
//! - Define the fetch contract between the catalog facade and remote
//!   bibliographic providers.
//! - Keep transport-class failures distinguishable from a genuine miss.
//!
//! # Invariants
//! - `Ok(None)` means the provider answered and knows no such ISBN.
//! - `Err(..)` means the provider could not answer; callers must never treat
//!   that as absence when deciding what to cache.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod google;
pub mod parser;
pub mod record;

use record::VolumeRecord;

pub type SourceResult<T> = Result<T, SourceError>;

/// Transport-class failures of a bibliographic fetch.
///
/// Every variant means "the provider could not answer"; a provider that
/// answers with zero matches is a miss, not an error.
#[derive(Debug)]
pub enum SourceError {
    /// Connection or I/O failure below HTTP.
    Transport(String),
    /// The request exceeded a configured timeout.
    Timeout(String),
    /// The provider answered with a non-success HTTP status.
    Status(u16),
    /// The response body did not decode as the expected wire shape.
    Decode(String),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "transport failure: {message}"),
            Self::Timeout(message) => write!(f, "request timed out: {message}"),
            Self::Status(code) => write!(f, "provider returned http status {code}"),
            Self::Decode(message) => write!(f, "undecodable provider response: {message}"),
        }
    }
}

impl Error for SourceError {}

/// Fetch contract for remote bibliographic catalogs.
pub trait CatalogSource {
    /// Fetches the volume record for one normalized ISBN.
    ///
    /// Returns `Ok(None)` when the provider has no entry for the ISBN.
    fn fetch_by_isbn(&self, isbn: &str) -> SourceResult<Option<VolumeRecord>>;
}
