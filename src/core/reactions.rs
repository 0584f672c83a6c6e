//! Like/dislike reactions

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::db::{DbEngine, ReactionTable};
use crate::error::{MuzeeError, Result};
use crate::models::{ReactedVideo, ReactionCounts, ReactionKind, User};

#[derive(Debug, Clone)]
pub struct ReactionLib {
    db: DbEngine,
}

impl ReactionLib {
    pub fn new(db: DbEngine) -> Self {
        Self { db }
    }

    /// Record a reaction, replacing any earlier one by the same user
    pub async fn react(&self, user: &User, video: &ReactedVideo, kind: ReactionKind) -> Result<()> {
        if video.id.trim().is_empty() {
            return Err(MuzeeError::invalid("video_id is required"));
        }

        ReactionTable::upsert(self.db.pool(), user.id, video, kind).await?;
        debug!(user_id = user.id, video_id = %video.id, reaction = kind.as_str(), "Reaction saved");
        Ok(())
    }

    /// Withdraw the user's reaction; a no-op when there is none
    pub async fn cancel(&self, user: &User, video_id: &str) -> Result<()> {
        ReactionTable::remove(self.db.pool(), user.id, video_id).await?;
        Ok(())
    }

    /// Aggregate counts for a video plus the viewer's own reaction
    pub async fn counts(&self, viewer: Option<&User>, video_id: &str) -> Result<ReactionCounts> {
        let pool = self.db.pool();
        let (likes, dislikes) = ReactionTable::counts(pool, video_id).await?;

        let user_reaction = match viewer {
            Some(user) => ReactionTable::user_reaction(pool, user.id, video_id).await?,
            None => None,
        };

        Ok(ReactionCounts {
            likes,
            dislikes,
            user_reaction,
        })
    }

    pub async fn all_counts(&self) -> Result<HashMap<String, (i64, i64)>> {
        ReactionTable::all_counts(self.db.pool()).await
    }

    pub async fn videos_for(&self, user: &User, kind: ReactionKind) -> Result<Vec<ReactedVideo>> {
        ReactionTable::videos_for_user(self.db.pool(), user.id, kind).await
    }

    /// Ids of every video the user disliked
    pub async fn disliked_ids(&self, user: &User) -> Result<HashSet<String>> {
        Ok(self
            .videos_for(user, ReactionKind::Dislike)
            .await?
            .into_iter()
            .map(|v| v.id)
            .collect())
    }
}
