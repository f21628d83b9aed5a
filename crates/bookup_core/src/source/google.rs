//! Google Books implementation of the catalog source.
//!
//! # Responsibility
//! - Query the volumes endpoint by ISBN over a pooled HTTP agent.
//! - Classify failures into the transport-class error taxonomy.
//!
//! # Invariants
//! - A well-formed response with zero items is a miss, never an error.
//! - The client performs no retries; recovery is the caller's decision.
//! - Emits `source_fetch` logging events with duration and status.

use crate::source::record::{VolumeRecord, VolumesResponse};
use crate::source::{CatalogSource, SourceError, SourceResult};
use log::{debug, warn};
use std::io::Read;
use std::time::{Duration, Instant};

/// Default volumes endpoint.
pub const GOOGLE_BOOKS_VOLUMES_URL: &str = "https://www.googleapis.com/books/v1/volumes";

const SOURCE_USER_AGENT: &str = concat!("bookup/", env!("CARGO_PKG_VERSION"));

/// Connection settings for the Google Books client.
#[derive(Debug, Clone)]
pub struct GoogleBooksConfig {
    /// Volumes endpoint; overridable so tests can point at a local server.
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for GoogleBooksConfig {
    fn default() -> Self {
        Self {
            base_url: GOOGLE_BOOKS_VOLUMES_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(7),
        }
    }
}

/// HTTP client for the Google Books volumes API.
pub struct GoogleBooksSource {
    agent: ureq::Agent,
    config: GoogleBooksConfig,
}

impl GoogleBooksSource {
    pub fn new(config: GoogleBooksConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.connect_timeout)
            .timeout_read(config.request_timeout)
            .timeout_write(config.request_timeout)
            .build();
        Self { agent, config }
    }

    fn volumes_url(&self, isbn: &str) -> String {
        format!(
            "{}?q={}",
            self.config.base_url,
            urlencoding::encode(&format!("isbn:{isbn}"))
        )
    }
}

impl Default for GoogleBooksSource {
    fn default() -> Self {
        Self::new(GoogleBooksConfig::default())
    }
}

impl CatalogSource for GoogleBooksSource {
    fn fetch_by_isbn(&self, isbn: &str) -> SourceResult<Option<VolumeRecord>> {
        let url = self.volumes_url(isbn);
        let started_at = Instant::now();
        debug!("event=source_fetch module=source status=start provider=google_books isbn={isbn}");

        let response = match self
            .agent
            .get(&url)
            .set("User-Agent", SOURCE_USER_AGENT)
            .set("Accept", "application/json")
            .timeout(self.config.request_timeout)
            .call()
        {
            Ok(response) => response,
            Err(err) => {
                let mapped = classify_call_error(err);
                warn!(
                    "event=source_fetch module=source status=error provider=google_books isbn={isbn} duration_ms={} error={mapped}",
                    started_at.elapsed().as_millis()
                );
                return Err(mapped);
            }
        };

        let mut body = String::new();
        if let Err(err) = response.into_reader().read_to_string(&mut body) {
            let mapped = classify_read_error(&err);
            warn!(
                "event=source_fetch module=source status=error provider=google_books isbn={isbn} duration_ms={} error={mapped}",
                started_at.elapsed().as_millis()
            );
            return Err(mapped);
        }

        let decoded: VolumesResponse = match serde_json::from_str(&body) {
            Ok(decoded) => decoded,
            Err(err) => {
                let mapped = SourceError::Decode(err.to_string());
                warn!(
                    "event=source_fetch module=source status=error provider=google_books isbn={isbn} duration_ms={} error={mapped}",
                    started_at.elapsed().as_millis()
                );
                return Err(mapped);
            }
        };

        let record = decoded.items.unwrap_or_default().into_iter().next();
        debug!(
            "event=source_fetch module=source status=ok provider=google_books isbn={isbn} duration_ms={} hit={}",
            started_at.elapsed().as_millis(),
            record.is_some()
        );
        Ok(record)
    }
}

fn classify_call_error(error: ureq::Error) -> SourceError {
    match error {
        ureq::Error::Status(code, _) => SourceError::Status(code),
        ureq::Error::Transport(transport) => {
            let message = transport.to_string();
            if is_timeout_message(&message) {
                SourceError::Timeout(message)
            } else {
                SourceError::Transport(message)
            }
        }
    }
}

fn classify_read_error(error: &std::io::Error) -> SourceError {
    let timed_out = matches!(
        error.kind(),
        std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
    ) || is_timeout_message(&error.to_string());

    if timed_out {
        SourceError::Timeout(error.to_string())
    } else {
        SourceError::Transport(error.to_string())
    }
}

fn is_timeout_message(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    lowered.contains("timed out") || lowered.contains("timeout")
}
