use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};

use crate::constants::SESSION_COOKIE;
use crate::entities::token::LoginResponse;
use crate::entities::user::{ChangePasswordRequest, LoginRequest};
use crate::errors::AuthError;
use crate::use_cases::extractors::AuthSession;
use crate::utils::get_client_ip::get_client_ip;
use crate::AppState;

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AuthError> {
    let ip = get_client_ip(&req, state.config.trust_x_forwarded_for);
    if !state.login_limiter.check(&ip) {
        tracing::warn!(ip = %ip, "Login attempt rate limited");
        return Err(AuthError::RateLimited);
    }

    let (user, token) = state.auth_service.login(body.into_inner()).await?;
    let session_id = state.sessions.insert(user.clone());

    let cookie = Cookie::build(SESSION_COOKIE, session_id)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::hours(state.config.session_expiry_hours))
        .finish();

    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(LoginResponse::new(token, user)))
}

#[post("/logout")]
pub async fn logout(
    _session: AuthSession,
    req: HttpRequest,
    state: web::Data<AppState>,
) -> impl Responder {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        state.sessions.remove(cookie.value());
    }

    let mut removal = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .finish();
    removal.make_removal();

    HttpResponse::Ok()
        .cookie(removal)
        .json(serde_json::json!({ "message": "Logout successful" }))
}

/// Reports whether the caller is authenticated. Never fails; an anonymous
/// caller gets `{"authenticated": false}`.
#[get("/status")]
pub async fn status(session: Option<AuthSession>) -> impl Responder {
    match session {
        Some(AuthSession(user)) => HttpResponse::Ok().json(serde_json::json!({
            "authenticated": true,
            "user": user,
        })),
        None => HttpResponse::Ok().json(serde_json::json!({ "authenticated": false })),
    }
}

#[post("/change-password")]
pub async fn change_password(
    session: AuthSession,
    state: web::Data<AppState>,
    body: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AuthError> {
    state
        .auth_service
        .change_password(session.0.id, body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Password updated successfully" })))
}
