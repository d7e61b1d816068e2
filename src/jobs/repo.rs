use anyhow::Context;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::jobs::repo_types::Job;

impl Job {
    /// Insert a job for `user_id`; the store assigns the timestamp.
    pub async fn insert(db: &SqlitePool, user_id: Uuid, description: &str) -> anyhow::Result<Job> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (id, user_id, description)
            VALUES (?, ?, ?)
            RETURNING id, user_id, description, timestamp
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(description)
        .fetch_one(db)
        .await
        .context("insert job")?;
        Ok(job)
    }

    pub async fn list_by_user(db: &SqlitePool, user_id: Uuid) -> anyhow::Result<Vec<Job>> {
        let rows = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, user_id, description, timestamp
              FROM jobs
             WHERE user_id = ?
             ORDER BY timestamp, rowid
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list jobs by user")?;
        Ok(rows)
    }

    pub async fn list_all(db: &SqlitePool) -> anyhow::Result<Vec<Job>> {
        let rows = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, user_id, description, timestamp
              FROM jobs
             ORDER BY timestamp, rowid
            "#,
        )
        .fetch_all(db)
        .await
        .context("list all jobs")?;
        Ok(rows)
    }
}
