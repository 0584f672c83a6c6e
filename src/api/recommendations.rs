//! Recommendation API route

use actix_web::{post, web, HttpResponse};

use super::SessionToken;
use crate::core::Preferences;
use crate::error::Result;
use crate::serializers::VideosResponse;
use crate::state::AppState;

/// recommend videos for artist/genre/mood; logged in callers skip their dislikes
#[post("/recommendations")]
pub async fn recommend(
    state: web::Data<AppState>,
    token: SessionToken,
    body: web::Json<Preferences>,
) -> Result<HttpResponse> {
    let viewer = state.sessions.current_identity(token.get()).await?;
    let videos = state.recommender.recommend(viewer.as_ref(), &body).await?;

    Ok(HttpResponse::Ok().json(VideosResponse { videos }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(recommend);
}
