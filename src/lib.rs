mod domain;
mod infrastructure;
mod interfaces;

pub mod background_task;
pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod settings;

pub use domain::{entities, use_cases};
pub use infrastructure::{auth, db, limiter, storage, utils};
pub use interfaces::{handlers, repositories, routes};

use auth::jwt::JwtService;
use auth::session::SessionStore;
use limiter::login_limiter::LoginRateLimiter;
use repositories::sqlx_repo::{SqlxProjectRepo, SqlxUserRepo};
use settings::AppConfig;
use storage::image_store::ImageStore;
use use_cases::auth::AuthService;
use use_cases::projects::ProjectService;

pub type AppAuthService = AuthService<SqlxUserRepo>;
pub type AppProjectService = ProjectService<SqlxProjectRepo>;

/// Shared application state handed to every worker.
pub struct AppState {
    pub config: AppConfig,
    pub auth_service: AppAuthService,
    pub project_service: AppProjectService,
    pub image_store: ImageStore,
    pub sessions: SessionStore,
    pub login_limiter: LoginRateLimiter,
}

impl AppState {
    pub fn new(config: &AppConfig, pool: sqlx::SqlitePool) -> Self {
        let auth_service = AuthService::new(SqlxUserRepo::new(pool.clone()), JwtService::new(config));

        let image_store = ImageStore::new(&config.uploads_dir);
        let project_service =
            ProjectService::new(SqlxProjectRepo::new(pool), image_store.clone());

        let sessions = SessionStore::new(chrono::Duration::hours(config.session_expiry_hours));
        let login_limiter = LoginRateLimiter::new(
            config.login_max_attempts,
            std::time::Duration::from_secs(config.login_window_minutes * 60),
        );

        AppState {
            config: config.clone(),
            auth_service,
            project_service,
            image_store,
            sessions,
            login_limiter,
        }
    }
}
