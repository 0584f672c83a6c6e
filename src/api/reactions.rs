//! Like/dislike API routes

use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;

use super::SessionToken;
use crate::error::{MuzeeError, Result};
use crate::models::{ReactedVideo, ReactionKind, User};
use crate::serializers::{MessageResponse, VideosResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReactionBody {
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub reaction: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "channelTitle")]
    pub channel_title: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Withdraw the caller's reaction instead of recording one
    #[serde(default)]
    pub cancel: bool,
}

async fn require_user(state: &AppState, token: &SessionToken) -> Result<User> {
    state
        .sessions
        .current_identity(token.get())
        .await?
        .ok_or(MuzeeError::Unauthenticated)
}

fn parse_kind(raw: &str) -> Result<ReactionKind> {
    ReactionKind::parse(raw)
        .ok_or_else(|| MuzeeError::invalid("Reaction must be \"like\" or \"dislike\""))
}

#[post("/video/reaction")]
pub async fn react(
    state: web::Data<AppState>,
    token: SessionToken,
    body: web::Json<ReactionBody>,
) -> Result<HttpResponse> {
    let user = require_user(&state, &token).await?;
    let body = body.into_inner();

    if body.cancel {
        state.reactions.cancel(&user, &body.video_id).await?;
        return Ok(HttpResponse::Ok().json(MessageResponse::new("Reaction cancelled")));
    }

    let kind = parse_kind(body.reaction.as_deref().unwrap_or_default())?;
    let video = ReactedVideo {
        id: body.video_id,
        title: body.title,
        channel_title: body.channel_title,
        thumbnail: body.thumbnail,
    };
    state.reactions.react(&user, &video, kind).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "{} recorded",
        kind.as_str()
    ))))
}

/// counts are public; `user_reaction` is filled only for a logged in caller
#[get("/video/{video_id}/reaction")]
pub async fn video_reaction(
    state: web::Data<AppState>,
    token: SessionToken,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let viewer = state.sessions.current_identity(token.get()).await?;
    let counts = state.reactions.counts(viewer.as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(counts))
}

#[get("/user/videos/{reaction}")]
pub async fn reacted_videos(
    state: web::Data<AppState>,
    token: SessionToken,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let user = require_user(&state, &token).await?;
    let kind = parse_kind(&path)?;
    let videos = state.reactions.videos_for(&user, kind).await?;

    Ok(HttpResponse::Ok().json(VideosResponse { videos }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(react)
        .service(video_reaction)
        .service(reacted_videos);
}
