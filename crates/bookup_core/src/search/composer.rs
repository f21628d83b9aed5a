//! Facet filter composition over the book repository.
//!
//! # Responsibility
//! - Combine the optional topic and author facets into one candidate set.
//! - Produce ordered, paginated summary pages with a total count.
//!
//! # Invariants
//! - Topic candidates are the union of category and tag matches; facets
//!   combine by intersection.
//! - An empty candidate intersection yields an empty page, never an error.
//! - Ordering is `title` (case-insensitive) with `id` as tie-break, so
//!   consecutive pages are disjoint.

use crate::model::book::{BookId, BookSummary};
use crate::repo::book_repo::{BookRepository, TitleOrder};
use crate::search::{SearchError, SearchResult};
use log::debug;
use std::collections::BTreeSet;

/// Default page size applied when a query carries no explicit `take`.
pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// Facet search parameters.
///
/// Both facets are optional; an entirely unfiltered query lists the whole
/// catalog. `topics` entries match either a category or a tag name,
/// case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct BookSearchQuery {
    pub author: Option<String>,
    pub topics: Vec<String>,
    pub skip: u32,
    /// Page size; `None` applies [`DEFAULT_PAGE_SIZE`].
    pub take: Option<u32>,
    pub order: TitleOrder,
}

impl BookSearchQuery {
    fn applied_take(&self) -> u32 {
        self.take.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub items: Vec<BookSummary>,
    /// Count of all candidates matching the filters, ignoring pagination.
    pub total: u64,
}

/// Runs one faceted search and returns an ordered, paginated page.
///
/// Blank facet values are treated as absent, matching the lenient
/// query-parameter contract of the HTTP layer above.
pub fn search<R: BookRepository>(repo: &R, query: &BookSearchQuery) -> SearchResult<SearchPage> {
    let topics = normalize_tokens(&query.topics);
    let author = query
        .author
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let candidates = build_candidates(repo, &topics, author)?;
    let page = paginate(repo, query, candidates.as_ref())?;
    debug!(
        "event=book_search module=search status=ok topics={} author={} skip={} take={} total={} returned={}",
        topics.len(),
        author.is_some(),
        query.skip,
        query.applied_take(),
        page.total,
        page.items.len()
    );
    Ok(page)
}

/// Searches by an explicit category token set.
///
/// Requires at least one non-blank token; an empty set is a client error
/// rather than an unfiltered listing.
pub fn search_by_categories<R: BookRepository>(
    repo: &R,
    categories: &[String],
    skip: u32,
    take: Option<u32>,
    order: TitleOrder,
) -> SearchResult<SearchPage> {
    let topics = normalize_tokens(categories);
    if topics.is_empty() {
        return Err(SearchError::NoCategories);
    }

    search(
        repo,
        &BookSearchQuery {
            author: None,
            topics,
            skip,
            take,
            order,
        },
    )
}

/// Resolves the facet candidate id set.
///
/// `None` means "no facet restriction"; `Some(empty)` means the facets
/// matched nothing and the page must be empty.
fn build_candidates<R: BookRepository>(
    repo: &R,
    topics: &[String],
    author: Option<&str>,
) -> SearchResult<Option<BTreeSet<BookId>>> {
    let mut candidates: Option<BTreeSet<BookId>> = None;

    if !topics.is_empty() {
        candidates = Some(repo.book_ids_by_topics(topics)?);
    }

    if let Some(author) = author {
        let by_author = repo.book_ids_by_author(author)?;
        candidates = Some(match candidates {
            Some(current) => current.intersection(&by_author).copied().collect(),
            None => by_author,
        });
    }

    Ok(candidates)
}

fn paginate<R: BookRepository>(
    repo: &R,
    query: &BookSearchQuery,
    candidates: Option<&BTreeSet<BookId>>,
) -> SearchResult<SearchPage> {
    let total = repo.count_books(candidates)?;
    let items = repo.list_summaries(query.order, query.skip, query.applied_take(), candidates)?;
    Ok(SearchPage { items, total })
}

/// Trims tokens and drops blanks, keeping first-seen order.
fn normalize_tokens(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|token| token.trim())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
