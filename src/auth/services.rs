use lazy_static::lazy_static;
use regex::Regex;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::auth::{
    dto::{RegisterForm, Session},
    error::AuthError,
    password::{hash_password, verify_password},
    repo_types::User,
};
use crate::config::AdminSeed;

pub const ADMIN_HOME: &str = "/admin";
pub const USER_HOME: &str = "/dashboard";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Where a freshly logged-in user lands.
pub fn landing_path(session: &Session) -> &'static str {
    if session.is_admin {
        ADMIN_HOME
    } else {
        USER_HOME
    }
}

/// Stores a new non-admin account with a salted password hash.
pub async fn register(db: &SqlitePool, form: RegisterForm) -> Result<User, AuthError> {
    let full_name = form.full_name.trim();
    let email = normalize_email(&form.email);

    if full_name.is_empty() {
        return Err(AuthError::InvalidInput("Navn mangler."));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AuthError::InvalidInput("Ugyldig e-postadresse."));
    }
    if form.password.is_empty() {
        return Err(AuthError::InvalidInput("Passord mangler."));
    }

    let hash = hash_password(&form.password)?;
    let user = User::create(db, full_name, &email, &hash)
        .await
        .map_err(|e| {
            if let crate::db::StoreError::DuplicateEmail = e {
                warn!(email = %email, "email already registered");
            }
            AuthError::from(e)
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Checks credentials and returns the session snapshot to issue.
pub async fn authenticate(
    db: &SqlitePool,
    email: &str,
    password: &str,
) -> Result<Session, AuthError> {
    let email = normalize_email(email);

    let Some(user) = User::find_by_email(db, &email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    info!(user_id = %user.id, admin = user.is_admin, "user logged in");
    Ok(Session {
        user_id: user.id,
        full_name: user.full_name,
        is_admin: user.is_admin,
    })
}

/// Makes sure the configured admin account exists with the configured password.
pub async fn bootstrap_admin(db: &SqlitePool, seed: &AdminSeed) -> anyhow::Result<User> {
    let email = normalize_email(&seed.email);
    anyhow::ensure!(is_valid_email(&email), "invalid admin email {:?}", seed.email);

    let hash = hash_password(&seed.password)?;
    let admin = User::upsert_admin(db, &seed.full_name, &email, &hash).await?;
    info!(user_id = %admin.id, email = %admin.email, "admin account seeded");
    Ok(admin)
}
