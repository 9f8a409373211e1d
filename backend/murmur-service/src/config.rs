/// Configuration management for murmur-service
///
/// Loads configuration from environment variables (a `.env` file is honored
/// by the binary before this runs).
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Content and pagination limits
    pub limits: LimitsConfig,
    /// Session lifetime settings
    pub session: SessionConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub port: u16,
}

/// Content and pagination limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum post body length in characters
    #[serde(default = "default_post_length_limit")]
    pub post_length_limit: usize,
    /// Posts shown per feed page
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: i64,
    /// Users shown per likers page
    #[serde(default = "default_users_per_page")]
    pub users_per_page: i64,
}

/// Session lifetime settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Hours a plain login session stays valid
    pub ttl_hours: i64,
    /// Days a remember-me session stays valid
    pub remember_ttl_days: i64,
}

fn default_post_length_limit() -> usize {
    140
}

fn default_posts_per_page() -> i64 {
    10
}

fn default_users_per_page() -> i64 {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("MURMUR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("MURMUR_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
        };

        let limits = LimitsConfig {
            post_length_limit: std::env::var("POST_LENGTH_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_post_length_limit),
            posts_per_page: std::env::var("POSTS_PER_PAGE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_posts_per_page),
            users_per_page: std::env::var("USERS_PER_PAGE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_users_per_page),
        };

        let session = SessionConfig {
            ttl_hours: std::env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(12),
            remember_ttl_days: std::env::var("REMEMBER_TTL_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        };

        if limits.posts_per_page < 1 || limits.users_per_page < 1 {
            anyhow::bail!("page sizes must be at least 1");
        }

        let _ = std::env::var("DATABASE_URL").context("DATABASE_URL environment variable not set")?;

        Ok(Config {
            app,
            limits,
            session,
        })
    }
}
