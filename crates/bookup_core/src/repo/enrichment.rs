//! Atomic enrichment writer for fetched bibliographic records.
//!
//! # Responsibility
//! - Persist one book plus its author/category rows and links in a single
//!   transaction.
//! - Reuse existing author/category rows instead of creating duplicates.
//!
//! # Invariants
//! - All rows commit together or not at all; no failure leaves partial
//!   author, category or association rows behind.
//! - Name deduplication is case-insensitive, both inside one draft and
//!   against rows already stored.
//! - A duplicate-ISBN abort surfaces as [`EnrichError::DuplicateIsbn`] so
//!   callers can recover by re-reading the winning row.

use crate::model::book::{normalize_isbn, Book, BookDraft};
use crate::model::entity::{name_dedupe_key, normalize_name};
use crate::repo::book_repo::{
    find_named_row, insert_book_row, insert_link_row, insert_named_row, RepoError, RepoResult,
    SqliteBookRepository,
};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type EnrichResult<T> = Result<T, EnrichError>;

/// Failure modes of the transactional enrichment write.
#[derive(Debug)]
pub enum EnrichError {
    /// Another writer stored the same ISBN first. The transaction was rolled
    /// back; the payload carries the normalized key for the re-read.
    DuplicateIsbn { isbn: String },
    Repo(RepoError),
}

impl Display for EnrichError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateIsbn { isbn } => {
                write!(f, "book with isbn {isbn} is already stored")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for EnrichError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DuplicateIsbn { .. } => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for EnrichError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Transactional writer that turns parsed drafts into stored catalog rows.
pub struct EnrichmentResolver<'conn> {
    conn: &'conn Connection,
}

impl<'conn> EnrichmentResolver<'conn> {
    /// Constructs a resolver from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let _ = SqliteBookRepository::try_new(conn)?;
        Ok(Self { conn })
    }

    /// Stores one book with its author and category links atomically.
    ///
    /// Author/category names are trimmed, deduplicated case-insensitively
    /// within the draft and matched against existing rows inside the same
    /// transaction; misses are created with their first-seen casing.
    pub fn resolve_and_insert(
        &self,
        draft: &BookDraft,
        authors: &[String],
        categories: &[String],
    ) -> EnrichResult<Book> {
        draft.validate().map_err(RepoError::from)?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;

        let author_ids = resolve_entity_ids(&tx, "authors", authors)?;
        let category_ids = resolve_entity_ids(&tx, "categories", categories)?;

        let book = match insert_book_row(&tx, draft) {
            Ok(book) => book,
            Err(RepoError::Conflict(_)) => {
                // Drop of `tx` rolls back the staged entity rows.
                return Err(EnrichError::DuplicateIsbn {
                    isbn: normalize_isbn(&draft.isbn),
                });
            }
            Err(err) => return Err(err.into()),
        };

        for author_id in &author_ids {
            insert_link_row(
                &tx,
                "INSERT INTO written (book_id, author_id) VALUES (?1, ?2);",
                book.id,
                *author_id,
                "written(book_id, author_id)",
            )?;
        }
        for category_id in &category_ids {
            insert_link_row(
                &tx,
                "INSERT INTO categorized (book_id, category_id) VALUES (?1, ?2);",
                book.id,
                *category_id,
                "categorized(book_id, category_id)",
            )?;
        }

        tx.commit().map_err(RepoError::from)?;
        Ok(book)
    }
}

/// Resolves draft names to entity ids inside the enclosing transaction.
///
/// Returns ids in first-appearance order with blanks dropped and
/// case-insensitive duplicates collapsed onto the first spelling.
fn resolve_entity_ids(
    tx: &Transaction<'_>,
    table: &'static str,
    names: &[String],
) -> EnrichResult<Vec<Uuid>> {
    let mut seen = BTreeSet::new();
    let mut ids = Vec::new();

    for raw in names {
        let Some(name) = normalize_name(raw) else {
            continue;
        };
        if !seen.insert(name_dedupe_key(&name)) {
            continue;
        }

        let id = match find_named_row(tx, table, &name)? {
            Some(row) => row.id,
            None => insert_named_row(tx, table, &name)?.id,
        };
        ids.push(id);
    }

    Ok(ids)
}
