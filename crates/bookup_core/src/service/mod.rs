//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, source and search calls into use-case APIs.
//! - Keep the HTTP layer decoupled from storage and transport details.

pub mod catalog;
