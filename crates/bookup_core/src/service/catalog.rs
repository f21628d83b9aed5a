//! Catalog facade: cache-aside lookup, tag attach and search delegation.
//!
//! # Responsibility
//! - Resolve ISBNs against local storage first, enriching from the external
//!   source on miss.
//! - Attach caller-created tags to stored books.
//! - Delegate facet search and topic queries to the search layer.
//!
//! # Invariants
//! - A losing duplicate-ISBN insert is recovered by re-reading the winning
//!   row; the conflict never reaches the caller.
//! - Remote miss, transport failure and parse rejection all surface as
//!   `NotFound`, with the cause retained for logging; none of them stores
//!   anything.
//! - The re-read after enrichment uses the draft's normalized ISBN, so a
//!   record resolved under a different identifier form is still found.

use crate::model::book::{normalize_isbn, BookDetail, BookId};
use crate::model::entity::validate_tag_name;
use crate::repo::book_repo::{
    find_named_row, insert_link_row, insert_named_row, BookRepository, RepoError,
    SqliteBookRepository, TitleOrder,
};
use crate::repo::enrichment::{EnrichError, EnrichmentResolver};
use crate::search::composer::{self, BookSearchQuery, SearchPage};
use crate::search::topics;
use crate::search::SearchResult;
use crate::source::parser::{parse_volume, ParseError};
use crate::source::{CatalogSource, SourceError};
use log::{info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Why an ISBN could not be resolved.
///
/// Callers see a plain not-found; the cause feeds logging and retry policy.
#[derive(Debug)]
pub enum MissCause {
    /// The external source answered and knows no such ISBN.
    RemoteMiss,
    /// The external source could not answer; nothing was cached, so a later
    /// call retries the fetch.
    Transport(SourceError),
    /// The fetched record was unusable.
    Parse(ParseError),
}

impl Display for MissCause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RemoteMiss => write!(f, "not known to the external source"),
            Self::Transport(err) => write!(f, "external source unavailable: {err}"),
            Self::Parse(err) => write!(f, "external record rejected: {err}"),
        }
    }
}

/// Facade-level error taxonomy.
#[derive(Debug)]
pub enum CatalogError {
    /// Malformed caller input; the message is caller-presentable.
    Validation(String),
    /// Tag attach target does not exist.
    BookMissing(BookId),
    /// The ISBN resolved neither locally nor externally.
    NotFound { isbn: String, cause: MissCause },
    /// A write succeeded but its read-back found nothing.
    Inconsistent(&'static str),
    /// Persistence-layer failure; nothing was left partially committed.
    Repo(RepoError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::BookMissing(id) => write!(f, "book not found: {id}"),
            Self::NotFound { isbn, cause } => {
                write!(f, "book with isbn {isbn} not found ({cause})")
            }
            Self::Inconsistent(details) => write!(f, "inconsistent catalog state: {details}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Outcome of one tag attach call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAttachment {
    /// Stored tag name; an existing tag keeps its first-seen casing.
    pub tag_name: String,
    /// `false` when the book already carried the tag.
    pub newly_linked: bool,
}

/// Catalog facade over one connection and one external source.
///
/// Holds no other state; parallel callers use one facade per thread against
/// the same database file. The unique ISBN index is the only serialization
/// point between concurrent enrichments of the same ISBN.
pub struct CatalogService<'conn, S: CatalogSource> {
    conn: &'conn Connection,
    source: S,
}

impl<'conn, S: CatalogSource> CatalogService<'conn, S> {
    pub fn new(conn: &'conn Connection, source: S) -> Self {
        Self { conn, source }
    }

    /// Resolves one book by ISBN, enriching the local store on miss.
    ///
    /// The external fetch runs at most once per call and is never retried
    /// here; a transport failure surfaces as `NotFound` without caching
    /// anything, so the next call simply fetches again.
    pub fn get_by_isbn(&self, isbn: &str) -> CatalogResult<BookDetail> {
        let key = normalize_isbn(isbn);
        if key.is_empty() {
            return Err(CatalogError::Validation(format!(
                "`{isbn}` is not a usable isbn"
            )));
        }

        let repo = SqliteBookRepository::try_new(self.conn)?;
        if let Some(detail) = repo.get_detail_by_isbn(&key)? {
            info!("event=isbn_lookup module=service status=hit isbn={key}");
            return Ok(detail);
        }

        let record = match self.source.fetch_by_isbn(&key) {
            Ok(Some(record)) => record,
            Ok(None) => {
                info!("event=isbn_lookup module=service status=remote_miss isbn={key}");
                return Err(CatalogError::NotFound {
                    isbn: key,
                    cause: MissCause::RemoteMiss,
                });
            }
            Err(err) => {
                warn!("event=isbn_lookup module=service status=transport_error isbn={key} error={err}");
                return Err(CatalogError::NotFound {
                    isbn: key,
                    cause: MissCause::Transport(err),
                });
            }
        };

        let drafts = match parse_volume(&record) {
            Ok(drafts) => drafts,
            Err(err) => {
                warn!("event=isbn_lookup module=service status=parse_rejected isbn={key} error={err}");
                return Err(CatalogError::NotFound {
                    isbn: key,
                    cause: MissCause::Parse(err),
                });
            }
        };

        // The record may have resolved under a different identifier form
        // than the caller's; all further reads use the stored key.
        let stored_key = drafts.book.isbn.clone();
        let resolver = EnrichmentResolver::try_new(self.conn)?;
        match resolver.resolve_and_insert(&drafts.book, &drafts.authors, &drafts.categories) {
            Ok(book) => {
                info!(
                    "event=isbn_enrich module=service status=ok isbn={stored_key} book_id={}",
                    book.id
                );
            }
            Err(EnrichError::DuplicateIsbn { isbn }) => {
                // A concurrent enrichment won the insert; its row is served.
                info!("event=isbn_enrich module=service status=lost_race isbn={isbn}");
            }
            Err(EnrichError::Repo(err)) => return Err(CatalogError::Repo(err)),
        }

        repo.get_detail_by_isbn(&stored_key)?
            .ok_or(CatalogError::Inconsistent(
                "enriched book missing on re-read",
            ))
    }

    /// Attaches one tag to one book, creating the tag on first use.
    ///
    /// Idempotent: attaching an already-linked tag reports
    /// `newly_linked = false` instead of failing. Tag row and link commit in
    /// one transaction.
    pub fn add_tag_to_book(&self, book_id: BookId, name: &str) -> CatalogResult<TagAttachment> {
        let tag_name =
            validate_tag_name(name).map_err(|err| CatalogError::Validation(err.to_string()))?;

        let repo = SqliteBookRepository::try_new(self.conn)?;
        if !repo.book_exists(book_id)? {
            return Err(CatalogError::BookMissing(book_id));
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;

        let tag = match find_named_row(&tx, "tags", &tag_name)? {
            Some(row) => row,
            None => insert_named_row(&tx, "tags", &tag_name)?,
        };

        let newly_linked = match insert_link_row(
            &tx,
            "INSERT INTO tagged (book_id, tag_id) VALUES (?1, ?2);",
            book_id,
            tag.id,
            "tagged(book_id, tag_id)",
        ) {
            Ok(()) => true,
            Err(RepoError::Conflict(_)) => false,
            Err(err) => return Err(err.into()),
        };

        tx.commit().map_err(RepoError::from)?;
        info!(
            "event=tag_attach module=service status=ok book_id={book_id} tag={} newly_linked={newly_linked}",
            tag.name
        );
        Ok(TagAttachment {
            tag_name: tag.name,
            newly_linked,
        })
    }

    /// Runs one faceted search.
    pub fn search(&self, query: &BookSearchQuery) -> SearchResult<SearchPage> {
        let repo = SqliteBookRepository::try_new(self.conn)?;
        composer::search(&repo, query)
    }

    /// Searches by an explicit category token set; requires at least one
    /// non-blank token.
    pub fn search_by_categories(
        &self,
        categories: &[String],
        skip: u32,
        take: Option<u32>,
        order: TitleOrder,
    ) -> SearchResult<SearchPage> {
        let repo = SqliteBookRepository::try_new(self.conn)?;
        composer::search_by_categories(&repo, categories, skip, take, order)
    }

    /// Lists every distinct topic name.
    pub fn all_topics(&self) -> SearchResult<Vec<String>> {
        let repo = SqliteBookRepository::try_new(self.conn)?;
        topics::all_topic_names(&repo)
    }

    /// Finds topic names containing the fragment.
    pub fn search_topics(&self, predicate: &str, take: Option<u32>) -> SearchResult<Vec<String>> {
        let repo = SqliteBookRepository::try_new(self.conn)?;
        topics::search_topic_names(&repo, predicate, take)
    }

    /// Draws `n` distinct topic names uniformly at random.
    pub fn random_topics(&self, n: usize) -> SearchResult<Vec<String>> {
        let repo = SqliteBookRepository::try_new(self.conn)?;
        topics::random_topics(&repo, n)
    }
}
