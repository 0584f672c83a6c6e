//! Playlist API routes

use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::Value;

use super::SessionToken;
use crate::core::access::parse_playlist_id;
use crate::error::Result;
use crate::serializers::{
    MessageResponse, PlaylistCreatedResponse, PlaylistListResponse, PlaylistResponse,
    VideoAddedResponse,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistBody {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddVideoBody {
    #[serde(default)]
    pub video: Option<Value>,
}

/// list the caller's playlists
#[get("")]
pub async fn list_playlists(
    state: web::Data<AppState>,
    token: SessionToken,
) -> Result<HttpResponse> {
    let playlists = state.playlists.list(token.get()).await?;
    Ok(HttpResponse::Ok().json(PlaylistListResponse { playlists }))
}

#[post("")]
pub async fn create_playlist(
    state: web::Data<AppState>,
    token: SessionToken,
    body: web::Json<CreatePlaylistBody>,
) -> Result<HttpResponse> {
    let playlist = state.playlists.create(token.get(), &body.name).await?;

    Ok(HttpResponse::Ok().json(PlaylistCreatedResponse {
        message: "Playlist created".to_string(),
        id: playlist.id,
        name: playlist.name,
    }))
}

#[get("/{playlist_id}")]
pub async fn get_playlist(
    state: web::Data<AppState>,
    token: SessionToken,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_playlist_id(&path)?;
    let playlist = state.playlists.get(token.get(), id).await?;
    Ok(HttpResponse::Ok().json(PlaylistResponse::from(playlist)))
}

#[delete("/{playlist_id}")]
pub async fn delete_playlist(
    state: web::Data<AppState>,
    token: SessionToken,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_playlist_id(&path)?;
    let name = state.playlists.delete(token.get(), id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Playlist \"{}\" deleted",
        name
    ))))
}

/// add a video; the body carries any supported search result shape
#[post("/{playlist_id}/videos")]
pub async fn add_video(
    state: web::Data<AppState>,
    token: SessionToken,
    path: web::Path<String>,
    body: web::Json<AddVideoBody>,
) -> Result<HttpResponse> {
    let id = parse_playlist_id(&path)?;
    let playlist = state
        .playlists
        .add_video(token.get(), id, body.video.as_ref())
        .await?;

    Ok(HttpResponse::Ok().json(VideoAddedResponse {
        message: "Video added to playlist".to_string(),
        playlist: playlist.summary(),
    }))
}

#[delete("/{playlist_id}/videos/{video_id}")]
pub async fn remove_video(
    state: web::Data<AppState>,
    token: SessionToken,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse> {
    let (playlist_id, video_id) = path.into_inner();
    let id = parse_playlist_id(&playlist_id)?;
    state
        .playlists
        .remove_video(token.get(), id, &video_id)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Video removed from playlist")))
}

/// configure playlist routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_playlists)
        .service(create_playlist)
        .service(get_playlist)
        .service(delete_playlist)
        .service(add_video)
        .service(remove_video);
}
