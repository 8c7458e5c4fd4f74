use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, Header, TokenData, Validation};

use crate::entities::token::Claims;
use crate::entities::user::SessionUser;
use crate::errors::AuthError;
use crate::settings::{AppConfig, JwtKeys};

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;

/// Mints and validates the bearer tokens handed out at login for
/// non-cookie clients. Tokens carry the same identity as the session.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            expiration: Duration::hours(config.token_expiry_hours),
        }
    }

    pub fn create_token(&self, user: &SessionUser) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = (now + self.expiration).timestamp() as usize;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            iat: now.timestamp() as usize,
            exp,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding).map_err(AuthError::from)
    }

    pub fn decode_token(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        decode::<Claims>(token, &self.keys.decoding, &validation).map_err(AuthError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AppEnvironment;

    fn test_config() -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            worker_count: 1,
            database_url: "sqlite::memory:".to_string(),
            uploads_dir: "uploads".to_string(),
            cors_allowed_origins: vec!["*".to_string()],
            jwt_secret: "test-secret-test-secret-test-secret-123".to_string(),
            token_expiry_hours: 24,
            session_expiry_hours: 24,
            login_max_attempts: 5,
            login_window_minutes: 15,
            trust_x_forwarded_for: false,
        }
    }

    fn test_user() -> SessionUser {
        SessionUser { id: 1, username: "admin".to_string() }
    }

    #[test]
    fn token_round_trip() {
        let service = JwtService::new(&test_config());
        let token = service.create_token(&test_user()).expect("token");

        let decoded = service.decode_token(&token).expect("decode");
        assert_eq!(decoded.claims.sub, "1");
        assert_eq!(decoded.claims.username, "admin");
        assert!(decoded.claims.exp > decoded.claims.iat);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let service = JwtService::new(&test_config());
        let mut token = service.create_token(&test_user()).expect("token");
        token.push('x');

        assert!(matches!(service.decode_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let service = JwtService::new(&test_config());
        let mut other_config = test_config();
        other_config.jwt_secret = "another-secret-another-secret-another-1".to_string();
        let other = JwtService::new(&other_config);

        let token = other.create_token(&test_user()).expect("token");
        assert!(service.decode_token(&token).is_err());
    }
}
