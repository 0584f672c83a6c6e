//! Built-in offline catalog used when no YouTube API key is configured

use async_trait::async_trait;
use serde_json::{json, Value};

use super::recommendations::{Preferences, VideoSource};
use crate::error::Result;

struct CatalogEntry {
    id: &'static str,
    title: &'static str,
    channel: &'static str,
}

const KPOP: &[CatalogEntry] = &[
    CatalogEntry { id: "dYRs7Q1vQ24", title: "NewJeans - Super Shy", channel: "NewJeans" },
    CatalogEntry { id: "pyf8cbqyfPs", title: "IU - Celebrity", channel: "IU Official" },
    CatalogEntry { id: "gdZLi9oWNZg", title: "BTS - Dynamite", channel: "HYBE LABELS" },
];

const POP: &[CatalogEntry] = &[
    CatalogEntry { id: "kTJczUoc26U", title: "The Weeknd - Blinding Lights", channel: "The Weeknd" },
    CatalogEntry { id: "JGwWNGJdvx8", title: "Ed Sheeran - Shape of You", channel: "Ed Sheeran" },
    CatalogEntry { id: "RsEZmictANA", title: "Taylor Swift - All Too Well", channel: "Taylor Swift" },
];

const ROCK: &[CatalogEntry] = &[
    CatalogEntry { id: "fJ9rUzIMcZQ", title: "Queen - Bohemian Rhapsody", channel: "Queen Official" },
    CatalogEntry { id: "1w7OgIMMRc4", title: "Imagine Dragons - Believer", channel: "ImagineDragons" },
];

/// Pick the catalog section for a set of preferences
///
/// An exact genre key wins; otherwise known artists map to their genre, and
/// anything else gets kpop.
fn section(prefs: &Preferences) -> &'static [CatalogEntry] {
    match prefs.genre.trim().to_lowercase().as_str() {
        "kpop" => return KPOP,
        "pop" => return POP,
        "rock" => return ROCK,
        _ => {}
    }

    let artist = prefs.artist.trim().to_lowercase();
    if artist.contains("bts") || artist.contains("방탄") {
        KPOP
    } else if artist.contains("taylor") || artist.contains("ed sheeran") {
        POP
    } else if artist.contains("queen") || artist.contains("imagine dragons") {
        ROCK
    } else {
        KPOP
    }
}

/// Video source backed by the built-in catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogSource;

#[async_trait]
impl VideoSource for CatalogSource {
    async fn search(&self, _query: &str, prefs: &Preferences, max_results: u32) -> Result<Vec<Value>> {
        Ok(section(prefs)
            .iter()
            .take(max_results as usize)
            .map(|e| {
                json!({
                    "id": e.id,
                    "title": e.title,
                    "channel": e.channel,
                    "thumbnail": format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", e.id),
                })
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "catalog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefs(artist: &str, genre: &str) -> Preferences {
        Preferences {
            artist: artist.to_string(),
            genre: genre.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_genre_key_wins() {
        assert_eq!(section(&prefs("BTS", "rock"))[0].id, "fJ9rUzIMcZQ");
        assert_eq!(section(&prefs("", "Pop"))[0].id, "kTJczUoc26U");
    }

    #[test]
    fn test_artist_keywords() {
        assert_eq!(section(&prefs("Taylor Swift", ""))[0].id, "kTJczUoc26U");
        assert_eq!(section(&prefs("방탄소년단", "jazz"))[0].id, "dYRs7Q1vQ24");
        assert_eq!(section(&prefs("imagine dragons", ""))[1].id, "1w7OgIMMRc4");
        assert_eq!(section(&prefs("unknown", ""))[0].id, "dYRs7Q1vQ24");
    }

    #[tokio::test]
    async fn test_catalog_respects_max_results() {
        let hits = CatalogSource.search("", &prefs("", "kpop"), 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0]["channel"], "NewJeans");
    }
}
