//! Domain model for the book catalog.
//!
//! # Responsibility
//! - Define the canonical records shared by repository, search and facade layers.
//! - Own input validation and the identifier/name normalization policy.
//!
//! # Invariants
//! - Every stored object is identified by a stable UUID.
//! - ISBNs are normalized before any lookup or write.
//! - Entity names keep their first-seen casing; deduplication is case-insensitive.

pub mod book;
pub mod entity;
