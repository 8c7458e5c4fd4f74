use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::constants::SESSION_COOKIE;
use crate::entities::user::SessionUser;
use crate::errors::AuthError;
use crate::AppState;

/// Extractor for the authenticated admin, accepting either the session
/// cookie or an `Authorization: Bearer` token. Returns 401 when neither
/// resolves. Usage: add `session: AuthSession` as a handler parameter, or
/// `Option<AuthSession>` where anonymous access is allowed.
#[derive(Debug, Clone)]
pub struct AuthSession(pub SessionUser);

impl FromRequest for AuthSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(authenticate(req).ok_or_else(|| AuthError::Unauthorized.into()))
    }
}

fn authenticate(req: &HttpRequest) -> Option<AuthSession> {
    let state = req.app_data::<web::Data<AppState>>()?;

    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if let Some(user) = state.sessions.get(cookie.value()) {
            return Some(AuthSession(user));
        }
    }

    let header = req.headers().get(actix_web::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?;
    let claims = state
        .auth_service
        .token_service
        .decode_token(token)
        .ok()?
        .claims;
    let id = claims.sub.parse::<i64>().ok()?;

    Some(AuthSession(SessionUser {
        id,
        username: claims.username,
    }))
}
