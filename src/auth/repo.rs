use anyhow::Context;
use tracing::warn;

use crate::auth::repo_types::User;
use crate::db::StoreError;
use sqlx::SqlitePool;
use uuid::Uuid;

impl User {
    /// Find a user by (already normalized) email.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, email, password, is_admin
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a regular (non-admin) user. Fails with `DuplicateEmail` if the email is taken.
    pub async fn create(
        db: &SqlitePool,
        full_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, full_name, email, password, is_admin)
            VALUES (?, ?, ?, ?, 0)
            RETURNING id, full_name, email, password, is_admin
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
        .map_err(StoreError::from_insert)
    }

    /// Insert the admin account, or promote and re-key it if the email already exists.
    /// Any other account still flagged as admin is demoted in the same transaction,
    /// so exactly one admin remains.
    pub async fn upsert_admin(
        db: &SqlitePool,
        full_name: &str,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<User> {
        let mut tx = db.begin().await.context("begin tx")?;

        let demoted = sqlx::query("UPDATE users SET is_admin = 0 WHERE is_admin = 1 AND email <> ?")
            .bind(email)
            .execute(&mut *tx)
            .await
            .context("demote stale admins")?
            .rows_affected();
        if demoted > 0 {
            warn!(demoted, "previous admin accounts demoted");
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, full_name, email, password, is_admin)
            VALUES (?, ?, ?, ?, 1)
            ON CONFLICT (email) DO UPDATE
               SET full_name = excluded.full_name,
                   password  = excluded.password,
                   is_admin  = 1
            RETURNING id, full_name, email, password, is_admin
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(full_name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .context("upsert admin")?;

        tx.commit().await.context("commit tx")?;
        Ok(user)
    }

    pub async fn find_by_id(db: &SqlitePool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, email, password, is_admin
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// All users in registration order.
    pub async fn list_all(db: &SqlitePool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, email, password, is_admin
            FROM users
            ORDER BY rowid
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(users)
    }
}
