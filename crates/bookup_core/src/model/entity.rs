//! Author, category and tag records plus the shared name policy.
//!
//! # Responsibility
//! - Define the three name entities linked to books.
//! - Own name normalization and tag length validation.
//!
//! # Invariants
//! - Names are stored trimmed, keeping their first-seen casing.
//! - Name uniqueness is advisory: deduplication happens in write logic,
//!   not via storage constraints.
//! - Tag names hold 3 to 30 characters after trimming.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type AuthorId = Uuid;
pub type CategoryId = Uuid;
pub type TagId = Uuid;

/// Minimum tag name length in characters, counted after trimming.
pub const TAG_NAME_MIN_CHARS: usize = 3;
/// Maximum tag name length in characters, counted after trimming.
pub const TAG_NAME_MAX_CHARS: usize = 30;

/// Stored author record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: AuthorId,
    pub name: String,
    /// Unix epoch milliseconds, set by storage on insert.
    pub created_at: i64,
}

/// Stored category record. Categories arrive from the bibliographic source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub created_at: i64,
}

/// Stored tag record. Tags are attached by callers after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub created_at: i64,
}

/// Validation failures for entity names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameValidationError {
    Blank,
    TagLength { chars: usize },
}

impl Display for NameValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => write!(f, "entity name is blank"),
            Self::TagLength { chars } => write!(
                f,
                "tag name must be {TAG_NAME_MIN_CHARS} to {TAG_NAME_MAX_CHARS} characters after trimming, got {chars}"
            ),
        }
    }
}

impl Error for NameValidationError {}

/// Normalizes one entity name: trims whitespace, keeps casing.
///
/// Returns `None` for blank input so callers can drop it.
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Case-insensitive dedupe key for an entity name.
///
/// Matches the storage-side `COLLATE NOCASE` comparison (ASCII folding) so
/// in-memory deduplication and SQL lookups agree.
pub fn name_dedupe_key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

/// Validates a tag name and returns its trimmed stored form.
pub fn validate_tag_name(raw: &str) -> Result<String, NameValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NameValidationError::Blank);
    }
    let chars = trimmed.chars().count();
    if !(TAG_NAME_MIN_CHARS..=TAG_NAME_MAX_CHARS).contains(&chars) {
        return Err(NameValidationError::TagLength { chars });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_name_trims_and_keeps_casing() {
        assert_eq!(normalize_name("  Science Fiction "), Some("Science Fiction".to_string()));
        assert_eq!(normalize_name("   "), None);
    }

    #[test]
    fn dedupe_key_folds_case() {
        assert_eq!(name_dedupe_key(" Ursula K. Le Guin "), "ursula k. le guin");
        assert_eq!(name_dedupe_key("FANTASY"), name_dedupe_key("fantasy"));
    }

    #[test]
    fn tag_name_bounds() {
        assert_eq!(validate_tag_name("  sci-fi  "), Ok("sci-fi".to_string()));
        assert_eq!(validate_tag_name("ab"), Err(NameValidationError::TagLength { chars: 2 }));
        assert_eq!(
            validate_tag_name(&"x".repeat(31)),
            Err(NameValidationError::TagLength { chars: 31 })
        );
        assert_eq!(validate_tag_name(" "), Err(NameValidationError::Blank));
    }
}
