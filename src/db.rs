use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

/// Failures of the store that callers are expected to handle.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Maps a unique-index violation on insert to `DuplicateEmail`.
    pub(crate) fn from_insert(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::DuplicateEmail,
            _ => Self::Database(e),
        }
    }
}

pub async fn connect(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("parse database url {}", database_url))?
        .create_if_missing(true)
        .foreign_keys(true);
    let db = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .context("connect to database")?;
    info!(url = %database_url, "database connected");
    Ok(db)
}

pub async fn migrate(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}

/// Private in-memory store with the schema applied.
///
/// A single connection is kept open for the lifetime of the pool, since every
/// new sqlite memory connection would see an empty database.
pub async fn memory() -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let db = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .context("open in-memory database")?;
    migrate(&db).await?;
    Ok(db)
}

/// Deletes every account. Jobs go with them so no job is left without its user.
pub async fn reset_users(db: &SqlitePool) -> anyhow::Result<u64> {
    let mut tx = db.begin().await.context("begin tx")?;
    sqlx::query("DELETE FROM jobs")
        .execute(&mut *tx)
        .await
        .context("delete jobs")?;
    let removed = sqlx::query("DELETE FROM users")
        .execute(&mut *tx)
        .await
        .context("delete users")?
        .rows_affected();
    tx.commit().await.context("commit tx")?;
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::User;
    use crate::jobs::repo_types::Job;
    use uuid::Uuid;

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = memory().await.unwrap();
        migrate(&db).await.expect("second run is a no-op");
    }

    #[tokio::test]
    async fn reset_removes_users_and_their_jobs() {
        let db = memory().await.unwrap();
        let user = User::create(&db, "Kari", "kari@x.no", "hash").await.unwrap();
        Job::insert(&db, user.id, "Vask hytte").await.unwrap();

        let removed = reset_users(&db).await.unwrap();
        assert_eq!(removed, 1);
        assert!(User::list_all(&db).await.unwrap().is_empty());
        assert!(Job::list_all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn jobs_require_an_existing_user() {
        let db = memory().await.unwrap();
        let err = Job::insert(&db, Uuid::new_v4(), "orphan").await.unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
