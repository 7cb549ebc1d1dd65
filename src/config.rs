//! Application configuration loaded from environment variables.
//!
//! Values are read once at startup. A `.env` file in the working directory
//! is honored for local development.

use std::env;
use std::str::FromStr;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Accept the `demo` / `demo` credential pair
    pub demo_login_enabled: bool,
    /// Load sample students, teams and activities at startup
    pub seed_sample_data: bool,
    /// Weekly activity count goal shown on the dashboard
    pub weekly_activity_goal: u32,
    /// Weekly points goal shown on the dashboard
    pub weekly_points_goal: u32,
    /// How often leaderboard ranks are snapshotted for rank changes
    pub leaderboard_snapshot_hours: u64,
}

impl Config {
    /// Config for tests: fixed signing key, demo login on, no seed data.
    pub fn test_default() -> Self {
        Self {
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!!".to_vec(),
            demo_login_enabled: true,
            seed_sample_data: false,
            weekly_activity_goal: 10,
            weekly_points_goal: 500,
            leaderboard_snapshot_hours: 168,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_signing_key = env::var("JWT_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
            .trim()
            .to_string()
            .into_bytes();
        if jwt_signing_key.len() < 32 {
            return Err(ConfigError::Invalid(
                "JWT_SIGNING_KEY",
                "must be at least 32 bytes".to_string(),
            ));
        }

        Ok(Self {
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: parse_var("PORT", 8080)?,
            jwt_signing_key,
            demo_login_enabled: parse_var("DEMO_LOGIN_ENABLED", true)?,
            seed_sample_data: parse_var("SEED_SAMPLE_DATA", true)?,
            weekly_activity_goal: parse_var("WEEKLY_ACTIVITY_GOAL", 10)?,
            weekly_points_goal: parse_var("WEEKLY_POINTS_GOAL", 500)?,
            leaderboard_snapshot_hours: parse_var("LEADERBOARD_SNAPSHOT_HOURS", 168)?,
        })
    }
}

/// Read an optional variable, falling back to `default` when unset.
fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::Invalid(name, e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
