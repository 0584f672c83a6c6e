//! Video records and playlist membership entries

use serde::{Deserialize, Serialize};

/// Canonical video shape produced by the result adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRecord {
    /// Platform video id
    pub id: String,
    pub title: String,
    pub channel_title: String,
    /// Raw view count, 0 when unknown
    pub view_count: i64,
    /// Display string, "N/A" when unknown
    pub formatted_view_count: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// A copy of a video's display data stored in one playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoEntry {
    #[serde(flatten)]
    pub video: VideoRecord,
    /// Unix timestamp of insertion
    #[serde(rename = "addedAt")]
    pub added_at: i64,
}
