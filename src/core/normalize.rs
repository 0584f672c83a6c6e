//! Recommendation result adapter
//!
//! Turns any of the search result shapes the client may hold into the canonical
//! [`VideoRecord`] stored in playlists:
//!
//! - a flat backend record: `{ id, title, channelTitle, viewCount, formattedViewCount, thumbnail }`
//! - a YouTube `videos` item: `{ id, snippet: {..}, statistics: { viewCount } }`
//! - a YouTube `search` item: `{ id: { videoId }, snippet: {..} }` (no statistics)
//! - an offline catalog entry: `{ id, title, channel }`

use serde_json::Value;

use crate::error::{MuzeeError, Result};
use crate::models::VideoRecord;
use crate::utils::format::{format_view_count, VIEW_COUNT_UNAVAILABLE};

/// Normalize one raw result into a [`VideoRecord`]
///
/// `id` and `title` are mandatory; statistics, channel and thumbnail fall back
/// to sentinels when absent.
pub fn normalize(raw: &Value) -> Result<VideoRecord> {
    if !raw.is_object() {
        return Err(MuzeeError::MalformedResult(
            "expected a JSON object".to_string(),
        ));
    }

    let snippet = raw.get("snippet");

    let id = video_id(raw)
        .ok_or_else(|| MuzeeError::MalformedResult("missing video id".to_string()))?;

    let title = non_empty_str(raw.get("title"))
        .or_else(|| non_empty_str(snippet.and_then(|s| s.get("title"))))
        .ok_or_else(|| MuzeeError::MalformedResult("missing title".to_string()))?;

    let channel_title = non_empty_str(raw.get("channelTitle"))
        .or_else(|| non_empty_str(raw.get("channel")))
        .or_else(|| non_empty_str(snippet.and_then(|s| s.get("channelTitle"))))
        .unwrap_or_default();

    let view_count = raw
        .get("viewCount")
        .and_then(parse_count)
        .or_else(|| {
            raw.get("statistics")
                .and_then(|s| s.get("viewCount"))
                .and_then(parse_count)
        });

    let (view_count, formatted_view_count) = match view_count {
        Some(count) => {
            let formatted = non_empty_str(raw.get("formattedViewCount"))
                .unwrap_or_else(|| format_view_count(count));
            (count, formatted)
        }
        None => (0, VIEW_COUNT_UNAVAILABLE.to_string()),
    };

    let thumbnail = non_empty_str(raw.get("thumbnail"))
        .or_else(|| snippet.and_then(snippet_thumbnail));

    Ok(VideoRecord {
        id,
        title,
        channel_title,
        view_count,
        formatted_view_count,
        thumbnail,
    })
}

/// Normalize a batch, skipping (and logging) malformed entries
pub fn normalize_all(raw: &[Value]) -> Vec<VideoRecord> {
    raw.iter()
        .filter_map(|item| match normalize(item) {
            Ok(video) => Some(video),
            Err(e) => {
                tracing::debug!("Skipping search result: {}", e);
                None
            }
        })
        .collect()
}

fn video_id(raw: &Value) -> Option<String> {
    match raw.get("id")? {
        Value::String(_) => non_empty_str(raw.get("id")),
        Value::Object(inner) => non_empty_str(inner.get("videoId")),
        _ => None,
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// View counts arrive as numbers from our backend and as strings from YouTube
fn parse_count(value: &Value) -> Option<i64> {
    let count = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => s.trim().replace(',', "").parse::<i64>().ok(),
        _ => None,
    }?;

    (count >= 0).then_some(count)
}

fn snippet_thumbnail(snippet: &Value) -> Option<String> {
    let thumbnails = snippet.get("thumbnails")?;
    ["high", "medium", "default"]
        .iter()
        .find_map(|size| non_empty_str(thumbnails.get(size).and_then(|t| t.get("url"))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_backend_record() {
        let raw = json!({
            "id": "abc123",
            "title": "Song A",
            "channelTitle": "Artist A",
            "viewCount": 1000,
            "formattedViewCount": "1,000",
            "thumbnail": "https://i.ytimg.com/vi/abc123/hqdefault.jpg"
        });

        let video = normalize(&raw).unwrap();
        assert_eq!(video.id, "abc123");
        assert_eq!(video.title, "Song A");
        assert_eq!(video.channel_title, "Artist A");
        assert_eq!(video.view_count, 1000);
        assert_eq!(video.formatted_view_count, "1,000");
        assert!(video.thumbnail.is_some());
    }

    #[test]
    fn test_youtube_videos_item() {
        let raw = json!({
            "kind": "youtube#video",
            "id": "dQw4w9WgXcQ",
            "snippet": {
                "title": "Never Gonna Give You Up",
                "channelTitle": "Rick Astley",
                "thumbnails": { "high": { "url": "https://img/high.jpg" } }
            },
            "statistics": { "viewCount": "1500000000" }
        });

        let video = normalize(&raw).unwrap();
        assert_eq!(video.id, "dQw4w9WgXcQ");
        assert_eq!(video.channel_title, "Rick Astley");
        assert_eq!(video.view_count, 1_500_000_000);
        assert_eq!(video.formatted_view_count, "1,500,000,000");
        assert_eq!(video.thumbnail.as_deref(), Some("https://img/high.jpg"));
    }

    #[test]
    fn test_youtube_search_item_without_statistics() {
        let raw = json!({
            "id": { "kind": "youtube#video", "videoId": "xyz" },
            "snippet": {
                "title": "Live Session",
                "channelTitle": "Band",
                "thumbnails": { "default": { "url": "https://img/default.jpg" } }
            }
        });

        let video = normalize(&raw).unwrap();
        assert_eq!(video.id, "xyz");
        assert_eq!(video.view_count, 0);
        assert_eq!(video.formatted_view_count, "N/A");
        assert_eq!(video.thumbnail.as_deref(), Some("https://img/default.jpg"));
    }

    #[test]
    fn test_catalog_entry_uses_channel_alias() {
        let raw = json!({ "id": "gdZLi9oWNZg", "title": "BTS - Dynamite", "channel": "HYBE LABELS" });

        let video = normalize(&raw).unwrap();
        assert_eq!(video.channel_title, "HYBE LABELS");
        assert_eq!(video.formatted_view_count, "N/A");
        assert_eq!(video.thumbnail, None);
    }

    #[test]
    fn test_missing_mandatory_fields() {
        assert!(matches!(
            normalize(&json!({ "title": "No id" })),
            Err(MuzeeError::MalformedResult(_))
        ));
        assert!(matches!(
            normalize(&json!({ "id": "abc" })),
            Err(MuzeeError::MalformedResult(_))
        ));
        assert!(matches!(
            normalize(&json!({ "id": "   ", "title": "Blank id" })),
            Err(MuzeeError::MalformedResult(_))
        ));
        assert!(normalize(&json!("abc")).is_err());
    }

    #[test]
    fn test_garbage_view_count_falls_back() {
        let raw = json!({ "id": "a", "title": "t", "viewCount": "lots" });
        let video = normalize(&raw).unwrap();
        assert_eq!(video.view_count, 0);
        assert_eq!(video.formatted_view_count, "N/A");

        let raw = json!({ "id": "a", "title": "t", "viewCount": -5 });
        assert_eq!(normalize(&raw).unwrap().formatted_view_count, "N/A");
    }

    #[test]
    fn test_normalize_all_skips_bad_items() {
        let raw = vec![
            json!({ "id": "a", "title": "ok" }),
            json!({ "title": "no id" }),
            json!({ "id": "b", "title": "also ok", "viewCount": "12345" }),
        ];

        let videos = normalize_all(&raw);
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[1].formatted_view_count, "12,345");
    }
}
