//! muzee - music recommendations from YouTube with per-user playlists
//!
//! The binary in `main.rs` is a thin shell around this library; integration
//! tests build the same app in-process with [`configure_app`].

pub mod api;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod models;
pub mod serializers;
pub mod state;
pub mod utils;

use actix_cors::Cors;
use actix_web::web;

pub use error::{MuzeeError, Result};
pub use state::AppState;

/// Mount shared state and every route under `/api`
pub fn configure_app(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state))
            .service(web::scope("/api").configure(api::configure));
    }
}

/// CORS policy; an empty origin list allows any origin
pub fn build_cors(origins: &[String]) -> Cors {
    let cors = if origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}
