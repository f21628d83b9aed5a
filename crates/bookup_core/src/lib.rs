//! Core domain logic for the bookup catalog.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod source;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{normalize_isbn, Book, BookDetail, BookDraft, BookId, BookSummary};
pub use model::entity::{Author, Category, Tag};
pub use repo::book_repo::{
    BookRepository, RepoError, RepoResult, SqliteBookRepository, TitleOrder,
};
pub use repo::enrichment::{EnrichError, EnrichmentResolver};
pub use search::composer::{BookSearchQuery, SearchPage, DEFAULT_PAGE_SIZE};
pub use search::{SearchError, SearchResult};
pub use service::catalog::{
    CatalogError, CatalogResult, CatalogService, MissCause, TagAttachment,
};
pub use source::google::{GoogleBooksConfig, GoogleBooksSource};
pub use source::parser::{parse_volume, ParseError, VolumeDrafts};
pub use source::record::VolumeRecord;
pub use source::{CatalogSource, SourceError, SourceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
