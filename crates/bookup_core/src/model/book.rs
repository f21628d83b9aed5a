//! Book domain model.
//!
//! # Responsibility
//! - Define the stored book record plus its write draft and read projections.
//! - Own ISBN normalization so lookups and writes agree on one key form.
//!
//! # Invariants
//! - `isbn` is unique per book and immutable after creation.
//! - `title` is required; description/thumbnail/year are genuinely optional.
//! - `published_year` is year precision only; `None` means unknown.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a stored book.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type BookId = Uuid;

/// Canonical stored book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Stable global ID used for linking and auditing.
    pub id: BookId,
    /// Normalized ISBN, the external lookup key.
    pub isbn: String,
    /// Display title as delivered by the bibliographic source.
    pub title: String,
    /// Optional long-form description.
    pub description: Option<String>,
    /// Optional cover thumbnail URL.
    pub thumbnail: Option<String>,
    /// Publication year; `None` when the source gave nothing parseable.
    pub published_year: Option<i32>,
    /// Unix epoch milliseconds, set by storage on insert.
    pub created_at: i64,
}

impl Book {
    /// Validates a stored record against the write contract.
    ///
    /// Read paths use this to reject corrupted persisted state instead of
    /// masking it.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.isbn.is_empty() {
            return Err(BookValidationError::EmptyIsbn);
        }
        if self.title.trim().is_empty() {
            return Err(BookValidationError::BlankTitle);
        }
        Ok(())
    }
}

/// Write model for a book that has not been stored yet.
///
/// Drafts carry no id or timestamp; storage assigns both on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    pub isbn: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub published_year: Option<i32>,
}

impl BookDraft {
    /// Creates a draft with the two required fields; the rest default to `None`.
    pub fn new(isbn: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            description: None,
            thumbnail: None,
            published_year: None,
        }
    }

    /// Validates the draft against the write contract.
    ///
    /// # Invariants
    /// - `isbn` must be non-empty after normalization.
    /// - `title` must contain at least one non-whitespace character.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if normalize_isbn(&self.isbn).is_empty() {
            return Err(BookValidationError::EmptyIsbn);
        }
        if self.title.trim().is_empty() {
            return Err(BookValidationError::BlankTitle);
        }
        Ok(())
    }
}

/// Validation failures for book write drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookValidationError {
    EmptyIsbn,
    BlankTitle,
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyIsbn => write!(f, "book isbn is empty after normalization"),
            Self::BlankTitle => write!(f, "book title is blank"),
        }
    }
}

impl Error for BookValidationError {}

/// Listing projection: identity plus the merged topic names.
///
/// `topics` is the union of category and tag names linked to the book,
/// deduplicated exactly and ordered case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: BookId,
    pub isbn: String,
    pub title: String,
    pub thumbnail: Option<String>,
    pub topics: Vec<String>,
}

/// Detail projection: summary fields plus description, year and authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetail {
    pub id: BookId,
    pub isbn: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
    pub published_year: Option<i32>,
    /// Author names ordered case-insensitively.
    pub authors: Vec<String>,
    /// Category and tag names merged, ordered case-insensitively.
    pub topics: Vec<String>,
}

/// Normalizes an ISBN to its canonical stored form.
///
/// Keeps digits and the `X` check character (uppercased), drops hyphens,
/// spaces and any other separator. No checksum validation is performed.
pub fn normalize_isbn(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .collect::<String>()
        .to_uppercase()
}
