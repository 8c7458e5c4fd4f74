use serde::{Deserialize, Serialize};

use super::user::SessionUser;

/// Bearer token claims: user id as `sub`, plus the username for display.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: SessionUser,
}

impl LoginResponse {
    pub fn new(token: String, user: SessionUser) -> Self {
        LoginResponse {
            message: "Login successful".to_string(),
            token,
            user,
        }
    }
}
