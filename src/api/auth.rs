//! authentication api routes, session cookie based

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{get, post, web, HttpResponse};

use super::SessionToken;
use crate::config::SESSION_COOKIE;
use crate::core::Credentials;
use crate::error::Result;
use crate::models::Session;
use crate::serializers::{AuthResponse, AuthStatusResponse, MessageResponse};
use crate::state::AppState;

/// who is logged in
#[get("/status")]
pub async fn status(state: web::Data<AppState>, token: SessionToken) -> Result<HttpResponse> {
    let user = state.sessions.current_identity(token.get()).await?;
    Ok(HttpResponse::Ok().json(AuthStatusResponse::from_user(user.as_ref())))
}

/// register and log in
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse> {
    let opened = state.sessions.register(&body.username, &body.password).await?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&opened.session, state.config.secure_cookies))
        .json(AuthResponse::new("Registration complete", &opened.user)))
}

/// login endpoint
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<Credentials>,
) -> Result<HttpResponse> {
    let opened = state.sessions.authenticate(&body).await?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&opened.session, state.config.secure_cookies))
        .json(AuthResponse::new("Logged in", &opened.user)))
}

/// logout, always succeeds
#[post("/logout")]
pub async fn logout(state: web::Data<AppState>, token: SessionToken) -> Result<HttpResponse> {
    state.sessions.end_session(token.get()).await?;

    let cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .max_age(CookieDuration::seconds(0))
        .http_only(true)
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(MessageResponse::new("Logged out")))
}

fn session_cookie(session: &Session, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, session.token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(CookieDuration::seconds(session.remaining_secs()))
        .finish()
}

/// configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(status)
        .service(register)
        .service(login)
        .service(logout);
}
