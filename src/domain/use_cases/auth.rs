use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::entities::user::{ChangePasswordRequest, LoginRequest, SessionUser};
use crate::errors::AuthError;
use crate::infrastructure::auth::jwt::JwtService;
use crate::interfaces::repositories::user::UserRepository;

const MIN_PASSWORD_LENGTH: usize = 6;

/// The auth gate: credential checks and password maintenance over a user
/// repository, plus bearer-token minting for non-cookie clients. Session
/// bookkeeping lives in the HTTP layer, which owns the cookie.
pub struct AuthService<R>
where
    R: UserRepository,
{
    pub user_repo: R,
    pub token_service: JwtService,
}

impl<R> AuthService<R>
where
    R: UserRepository,
{
    pub fn new(user_repo: R, token_service: JwtService) -> Self {
        AuthService {
            user_repo,
            token_service,
        }
    }

    /// Validates credentials and mints a bearer token. The error shape is
    /// identical for an unknown username and a wrong password.
    pub async fn login(&self, request: LoginRequest) -> Result<(SessionUser, String), AuthError> {
        request.validate()?;

        let user = self
            .user_repo
            .get_by_username(&request.username)
            .await
            .map_err(AuthError::from)?
            .ok_or(AuthError::WrongCredentials)?;

        let password_valid = verify_password(&request.password, &user.password_hash)
            .map_err(|_| AuthError::WrongCredentials)?;
        if !password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let session_user = SessionUser::from(&user);
        let token = self.token_service.create_token(&session_user).map_err(|e| {
            tracing::warn!("Failed to create bearer token: {}", e);
            AuthError::TokenCreation
        })?;

        tracing::info!(username = %session_user.username, "User logged in");
        Ok((session_user, token))
    }

    /// Re-validates the current password before replacing the stored hash.
    /// Existing sessions stay valid.
    pub async fn change_password(
        &self,
        user_id: i64,
        request: ChangePasswordRequest,
    ) -> Result<(), AuthError> {
        if request.current_password.is_empty() || request.new_password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if request.new_password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::PasswordTooShort);
        }

        let user = self
            .user_repo
            .get_by_id(user_id)
            .await
            .map_err(AuthError::from)?
            .ok_or(AuthError::UserNotFound)?;

        let current_valid = verify_password(&request.current_password, &user.password_hash)?;
        if !current_valid {
            return Err(AuthError::CurrentPasswordIncorrect);
        }

        let new_hash = hash_password(&request.new_password)?;
        let updated = self
            .user_repo
            .update_password(user.id, &new_hash)
            .await
            .map_err(AuthError::from)?;
        if updated == 0 {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(username = %user.username, "Password updated");
        Ok(())
    }
}
