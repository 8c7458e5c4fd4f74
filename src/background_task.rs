use tokio::time::{interval, Duration};

use crate::auth::session::SessionStore;
use crate::limiter::login_limiter::LoginRateLimiter;

/// Sweeps expired sessions and stale rate-limit entries every ten minutes.
pub async fn start_maintenance_task(sessions: SessionStore, limiter: LoginRateLimiter) {
    let mut interval = interval(Duration::from_secs(60 * 10));

    loop {
        interval.tick().await;

        let expired_sessions = sessions.purge_expired();
        let stale_limits = limiter.purge_stale();
        if expired_sessions > 0 || stale_limits > 0 {
            tracing::debug!(
                "Maintenance sweep removed {} expired sessions and {} stale rate-limit entries",
                expired_sessions,
                stale_limits
            );
        }
    }
}
