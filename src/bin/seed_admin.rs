use anyhow::{bail, Context};

use portfolio_admin::auth::password::hash_password;
use portfolio_admin::db::sqlite::{create_pool, init_schema};
use portfolio_admin::repositories::sqlx_repo::SqlxUserRepo;
use portfolio_admin::repositories::user::UserRepository;
use portfolio_admin::settings::AppConfig;

/// Creates or updates the admin account from ADMIN_USERNAME and
/// ADMIN_PASSWORD. The API has no registration endpoint; this is the only
/// way credentials enter the database.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::new().context("Failed to load configuration")?;

    let username =
        std::env::var("ADMIN_USERNAME").context("ADMIN_USERNAME must be set")?;
    let password =
        std::env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;
    if password.len() < 6 {
        bail!("ADMIN_PASSWORD must be at least 6 characters long");
    }

    let pool = create_pool(&config.database_url)
        .await
        .context("Failed to open database")?;
    init_schema(&pool)
        .await
        .context("Failed to initialize database schema")?;

    let repo = SqlxUserRepo::new(pool);
    let password_hash = hash_password(&password)?;

    match repo.get_by_username(&username).await? {
        Some(user) => {
            repo.update_password(user.id, &password_hash).await?;
            tracing::info!("Updated password for existing admin '{}'", username);
        }
        None => {
            repo.create(&username, &password_hash).await?;
            tracing::info!("Created admin user '{}'", username);
        }
    }

    Ok(())
}
