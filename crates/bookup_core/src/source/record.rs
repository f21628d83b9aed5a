//! Typed wire records for the volumes API payload.
//!
//! # Responsibility
//! - Decode provider JSON into typed structures.
//! - Keep every payload field optional so absence decodes cleanly; the
//!   parser, not the decoder, decides what is required.

use serde::{Deserialize, Serialize};

/// Top-level volumes query response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    pub total_items: Option<i64>,
    pub items: Option<Vec<VolumeRecord>>,
}

/// One matched volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeRecord {
    pub volume_info: Option<VolumeInfo>,
}

/// Bibliographic block of one volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub description: Option<String>,
    /// Free-form date text such as `2016-07-12` or `1999`.
    pub published_date: Option<String>,
    pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
    pub image_links: Option<ImageLinks>,
}

/// One identifier entry, e.g. `{"type": "ISBN_13", "identifier": "978..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub identifier: Option<String>,
}

/// Cover image variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub small_thumbnail: Option<String>,
    pub thumbnail: Option<String>,
}
