use anyhow::Context;
use rand::{distributions::Alphanumeric, Rng};
use serde::Deserialize;

use crate::localtime;

pub const DEFAULT_TTL_MINUTES: i64 = 60 * 24 * 7;
/// Ten years.
pub const MAX_TTL_MINUTES: i64 = 525_600 * 10;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub ttl_minutes: i64,
    pub cookie_secure: bool,
}

/// Seed values for the bootstrap admin account.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub full_name: String,
    /// Set when no password was configured and one was generated at startup.
    #[serde(skip)]
    pub password_generated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    pub admin: AdminSeed,
    /// Wipes all accounts (and their jobs) before the admin is seeded.
    pub reset_users_on_start: bool,
    pub display_timezone: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://database.db".into());

        let session = SessionConfig {
            secret: std::env::var("SECRET_KEY").context("SECRET_KEY must be set")?,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "odyer".into()),
            ttl_minutes: parse_ttl_minutes(std::env::var("SESSION_TTL_MINUTES").ok().as_deref())?,
            cookie_secure: env_flag("SESSION_COOKIE_SECURE"),
        };
        anyhow::ensure!(!session.secret.is_empty(), "SECRET_KEY must not be empty");

        let (password, password_generated) = match std::env::var("ADMIN_PASSWORD") {
            Ok(p) if !p.is_empty() => (p, false),
            _ => (generate_password(), true),
        };
        let admin = AdminSeed {
            email: std::env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@localhost".into())
                .trim()
                .to_lowercase(),
            password,
            full_name: std::env::var("ADMIN_FULL_NAME").unwrap_or_else(|_| "Admin".into()),
            password_generated,
        };

        let display_timezone =
            std::env::var("DISPLAY_TIMEZONE").unwrap_or_else(|_| localtime::DEFAULT_ZONE.into());
        localtime::zone(&display_timezone)?;

        Ok(Self {
            database_url,
            session,
            admin,
            reset_users_on_start: env_flag("RESET_USERS_ON_START"),
            display_timezone,
        })
    }
}

fn parse_ttl_minutes(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TTL_MINUTES);
    };
    let ttl: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("SESSION_TTL_MINUTES is not a number: {:?}", raw))?;
    anyhow::ensure!(
        (1..=MAX_TTL_MINUTES).contains(&ttl),
        "SESSION_TTL_MINUTES must be between 1 and {}, got {}",
        MAX_TTL_MINUTES,
        ttl
    );
    Ok(ttl)
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

fn parse_flag(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect()
}


#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".into(),
        session: SessionConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            ttl_minutes: 5,
            cookie_secure: false,
        },
        admin: AdminSeed {
            email: "admin@test.local".into(),
            password: "admin-pw".into(),
            full_name: "Admin".into(),
            password_generated: false,
        },
        reset_users_on_start: false,
        display_timezone: localtime::DEFAULT_ZONE.into(),
    }
}
