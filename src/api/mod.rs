//! REST API routes for muzee

pub mod auth;
pub mod playlist;
pub mod reactions;
pub mod recommendations;

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{error::JsonPayloadError, web, FromRequest, HttpRequest};

use crate::config::SESSION_COOKIE;
use crate::error::MuzeeError;

/// Configure all API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        // Auth routes
        .service(web::scope("/auth").configure(auth::configure))
        // Playlist routes
        .service(web::scope("/playlists").configure(playlist::configure))
        // Recommendation routes
        .configure(recommendations::configure)
        // Like/dislike routes
        .configure(reactions::configure);
}

/// Session token presented by the client, if any
///
/// Taken from the session cookie, falling back to an
/// `Authorization: Bearer <token>` header.
#[derive(Debug, Clone, Default)]
pub struct SessionToken(Option<String>);

impl SessionToken {
    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl FromRequest for SessionToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(SessionToken(session_token(req))))
    }
}

fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    bearer_token(req)
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let header = req.headers().get("Authorization")?.to_str().ok()?.trim();
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();

    (!token.is_empty()).then(|| token.to_string())
}

/// Malformed JSON bodies get the same `{ "error" }` shape as everything else
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    MuzeeError::invalid(format!("Invalid request body: {}", err)).into()
}
