//! Environment-driven configuration, read once at startup.

use std::time::Duration;

use podharbor_auth::TokenLifetimes;
use podharbor_infra::RetryPolicy;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    /// The one address allowed to register the admin account.
    pub admin_email: String,
    pub token_lifetimes: TokenLifetimes,
    pub notify_retry: RetryPolicy,
}

impl AppConfig {
    /// Read configuration from the environment, with development fallbacks.
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("PODHARBOR_JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("PODHARBOR_JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let admin_email = std::env::var("PODHARBOR_ADMIN_EMAIL")
            .unwrap_or_else(|_| "admin@podharbor.dev".to_string())
            .to_lowercase();

        let access_days = env_i64("PODHARBOR_ACCESS_TOKEN_DAYS", 1);
        let refresh_days = env_i64("PODHARBOR_REFRESH_TOKEN_DAYS", 7);
        let verification_minutes = env_i64("PODHARBOR_VERIFICATION_TOKEN_MINUTES", 10);

        Self {
            bind_addr: std::env::var("PODHARBOR_BIND_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            jwt_secret,
            admin_email,
            token_lifetimes: TokenLifetimes::new(access_days, refresh_days, verification_minutes),
            notify_retry: RetryPolicy::default(),
        }
    }

    /// Deterministic configuration for tests.
    pub fn for_tests(jwt_secret: &str, admin_email: &str) -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            jwt_secret: jwt_secret.to_string(),
            admin_email: admin_email.to_lowercase(),
            token_lifetimes: TokenLifetimes::new(1, 7, 10),
            notify_retry: RetryPolicy {
                attempts: 4,
                delay: Duration::from_millis(5),
            },
        }
    }
}

fn env_i64(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
