//! Shared application state handed to every request handler

use std::sync::Arc;

use crate::config::UserConfig;
use crate::core::{
    PlaylistRepository, PlaylistService, ReactionLib, Recommender, SessionStore, VideoSource,
};
use crate::db::DbEngine;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub playlists: PlaylistService,
    pub reactions: ReactionLib,
    pub recommender: Recommender,
    pub config: UserConfig,
}

impl AppState {
    /// Wire the services, picking the video source from the config
    pub fn new(db: DbEngine, config: UserConfig) -> Self {
        let reactions = ReactionLib::new(db.clone());
        let recommender = Recommender::from_config(&config, reactions.clone());
        Self::assemble(db, config, reactions, recommender)
    }

    /// Same as [`AppState::new`] with an explicit video source
    pub fn with_source(db: DbEngine, config: UserConfig, source: Arc<dyn VideoSource>) -> Self {
        let reactions = ReactionLib::new(db.clone());
        let recommender = Recommender::new(source, reactions.clone(), config.max_results);
        Self::assemble(db, config, reactions, recommender)
    }

    fn assemble(
        db: DbEngine,
        config: UserConfig,
        reactions: ReactionLib,
        recommender: Recommender,
    ) -> Self {
        let sessions = SessionStore::new(db.clone(), config.session_ttl());
        let playlists = PlaylistService::new(sessions.clone(), PlaylistRepository::new(db));

        Self {
            sessions,
            playlists,
            reactions,
            recommender,
            config,
        }
    }
}
