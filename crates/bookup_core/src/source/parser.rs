//! Volume record to draft conversion.
//!
//! # Responsibility
//! - Convert one typed volume record into storable drafts.
//! - Enforce which payload fields are required and which degrade to `None`.
//!
//! # Invariants
//! - A missing identifier or title rejects the record; optional fields never
//!   reject anything.
//! - The returned draft ISBN is already normalized.
//! - `publishedDate` parsing only ever yields a year or `None`.

use crate::model::book::{normalize_isbn, BookDraft};
use crate::model::entity::normalize_name;
use crate::source::record::{IndustryIdentifier, VolumeRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static LEADING_YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})").expect("valid leading-year regex"));

pub type ParseResult<T> = Result<T, ParseError>;

/// Rejection reasons for fetched volume records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    MissingVolumeInfo,
    MissingIsbn,
    MissingTitle,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingVolumeInfo => write!(f, "volume record carries no volumeInfo block"),
            Self::MissingIsbn => write!(f, "volume record carries no usable industry identifier"),
            Self::MissingTitle => write!(f, "volume record carries no title"),
        }
    }
}

impl Error for ParseError {}

/// Parsed output: one book draft plus the entity names to link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeDrafts {
    pub book: BookDraft,
    /// Trimmed author names, blanks dropped. Deduplication happens at write
    /// time together with the stored rows.
    pub authors: Vec<String>,
    /// Trimmed category names, blanks dropped.
    pub categories: Vec<String>,
}

/// Converts one fetched volume record into storable drafts.
pub fn parse_volume(record: &VolumeRecord) -> ParseResult<VolumeDrafts> {
    let info = record
        .volume_info
        .as_ref()
        .ok_or(ParseError::MissingVolumeInfo)?;

    let isbn = pick_identifier(info.industry_identifiers.as_deref())?;
    let title = info
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .ok_or(ParseError::MissingTitle)?;

    let mut book = BookDraft::new(isbn, title);
    book.description = clean_optional_text(info.description.as_deref());
    book.thumbnail = info
        .image_links
        .as_ref()
        .and_then(|links| clean_optional_text(links.thumbnail.as_deref()));
    book.published_year = info.published_date.as_deref().and_then(parse_leading_year);

    Ok(VolumeDrafts {
        book,
        authors: clean_names(info.authors.as_deref()),
        categories: clean_names(info.categories.as_deref()),
    })
}

/// Picks the `ISBN_13` identifier when present, the first entry otherwise.
fn pick_identifier(identifiers: Option<&[IndustryIdentifier]>) -> ParseResult<String> {
    let identifiers = identifiers.unwrap_or(&[]);
    let chosen = identifiers
        .iter()
        .find(|entry| entry.kind.as_deref() == Some("ISBN_13"))
        .or_else(|| identifiers.first());

    let raw = chosen
        .and_then(|entry| entry.identifier.as_deref())
        .unwrap_or("");
    let normalized = normalize_isbn(raw);
    if normalized.is_empty() {
        return Err(ParseError::MissingIsbn);
    }
    Ok(normalized)
}

/// Extracts a leading 4-digit year; anything else degrades to `None`.
fn parse_leading_year(raw: &str) -> Option<i32> {
    LEADING_YEAR_RE
        .captures(raw.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

fn clean_optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn clean_names(raw: Option<&[String]>) -> Vec<String> {
    raw.unwrap_or(&[])
        .iter()
        .filter_map(|name| normalize_name(name))
        .collect()
}
