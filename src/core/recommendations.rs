//! Video recommendations
//!
//! Builds a search query from the listener's preferences, asks a
//! [`VideoSource`] for hits, and returns them normalized, with disliked videos
//! removed and community like counts attached.

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::fallback::CatalogSource;
use super::normalize::normalize_all;
use super::reactions::ReactionLib;
use crate::config::UserConfig;
use crate::error::{MuzeeError, Result};
use crate::models::{User, VideoRecord};

const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// YouTube's "Music" video category
const MUSIC_CATEGORY_ID: &str = "10";

/// What the listener asked for
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub artist: String,
    pub genre: String,
    pub mood: String,
    /// Rank by likes first, then views
    pub sort_by_likes: bool,
}

impl Preferences {
    /// Search query for these preferences, `None` when nothing was given
    pub fn query(&self) -> Option<String> {
        let artist = self.artist.trim();
        let genre = self.genre.trim();
        let mood = self.mood.trim();

        if artist.is_empty() && genre.is_empty() && mood.is_empty() {
            return None;
        }

        let mut query = String::new();
        if !artist.is_empty() {
            query.push_str(&format!("{} ", artist));
        }
        if !genre.is_empty() {
            query.push_str(&format!("{} music ", genre));
        }
        if !mood.is_empty() {
            query.push_str(&format!("{} music", mood));
        }

        Some(query)
    }
}

/// A recommended video with community reaction counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub video: VideoRecord,
    pub likes: i64,
    pub dislikes: i64,
}

/// Anything that can turn a query into raw search results
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Raw, not yet normalized results
    async fn search(&self, query: &str, prefs: &Preferences, max_results: u32) -> Result<Vec<Value>>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// YouTube Data API v3 search, followed by a statistics lookup
#[derive(Debug, Clone)]
pub struct YouTubeSource {
    client: Client,
    api_key: String,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct ItemsResponse {
    #[serde(default)]
    items: Vec<Value>,
}

impl YouTubeSource {
    pub fn new(api_key: String) -> Self {
        Self::with_api_url(api_key, YOUTUBE_API_URL.to_string())
    }

    pub fn with_api_url(api_key: String, api_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url,
        }
    }

    async fn get_items(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Vec<Value>> {
        let url = format!("{}/{}", self.api_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, endpoint, "YouTube API error: {}", body);
            return Err(MuzeeError::Upstream(format!(
                "YouTube {} returned {}",
                endpoint, status
            )));
        }

        let parsed: ItemsResponse = response.json().await?;
        Ok(parsed.items)
    }
}

#[async_trait]
impl VideoSource for YouTubeSource {
    async fn search(&self, query: &str, _prefs: &Preferences, max_results: u32) -> Result<Vec<Value>> {
        let max_results = max_results.to_string();
        let hits = self
            .get_items(
                "search",
                &[
                    ("q", query),
                    ("part", "snippet"),
                    ("type", "video"),
                    ("videoCategoryId", MUSIC_CATEGORY_ID),
                    ("maxResults", max_results.as_str()),
                ],
            )
            .await?;

        let ids: Vec<&str> = hits
            .iter()
            .filter_map(|item| item.get("id")?.get("videoId")?.as_str())
            .collect();

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = ids.join(",");
        self.get_items("videos", &[("id", ids.as_str()), ("part", "snippet,statistics")])
            .await
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}

/// Recommendation pipeline over a pluggable source
#[derive(Clone)]
pub struct Recommender {
    source: Arc<dyn VideoSource>,
    reactions: ReactionLib,
    max_results: u32,
}

impl Recommender {
    pub fn new(source: Arc<dyn VideoSource>, reactions: ReactionLib, max_results: u32) -> Self {
        Self {
            source,
            reactions,
            max_results,
        }
    }

    /// YouTube when an API key is configured, the offline catalog otherwise
    pub fn from_config(config: &UserConfig, reactions: ReactionLib) -> Self {
        let source: Arc<dyn VideoSource> = if config.has_youtube_key() {
            Arc::new(YouTubeSource::new(config.youtube_api_key.clone()))
        } else {
            Arc::new(CatalogSource)
        };

        Self::new(source, reactions, config.max_results)
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub async fn recommend(
        &self,
        viewer: Option<&User>,
        prefs: &Preferences,
    ) -> Result<Vec<Recommendation>> {
        let query = prefs
            .query()
            .ok_or_else(|| MuzeeError::invalid("Enter at least one preference"))?;

        let raw = self.source.search(&query, prefs, self.max_results).await?;
        let mut videos = normalize_all(&raw);

        if let Some(user) = viewer {
            let disliked = self.reactions.disliked_ids(user).await?;
            videos.retain(|v| !disliked.contains(&v.id));
        }

        let counts = self.reactions.all_counts().await?;
        let mut recommendations: Vec<Recommendation> = videos
            .into_iter()
            .map(|video| {
                let (likes, dislikes) = counts.get(&video.id).copied().unwrap_or((0, 0));
                Recommendation {
                    video,
                    likes,
                    dislikes,
                }
            })
            .collect();

        if prefs.sort_by_likes {
            recommendations.sort_by_key(|r| Reverse((r.likes, r.video.view_count)));
        } else {
            recommendations.sort_by_key(|r| Reverse(r.video.view_count));
        }

        debug!(
            source = self.source.name(),
            query = %query,
            results = recommendations.len(),
            "Recommendations ready"
        );

        Ok(recommendations)
    }
}
