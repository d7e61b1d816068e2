use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::auth::dto::Session;
use crate::jobs::{dto::JobView, error::JobError, repo_types::Job};

pub const ORDER_ACCEPTED: &str = "Bestilling mottatt!";

/// Stores a job attributed to the session's user.
pub async fn submit(db: &SqlitePool, session: &Session, description: &str) -> Result<Job, JobError> {
    if description.trim().is_empty() {
        return Err(JobError::EmptyDescription);
    }
    let job = Job::insert(db, session.user_id, description).await?;
    info!(job_id = %job.id, user_id = %job.user_id, "order stored");
    Ok(job)
}

pub async fn jobs_for_user(
    db: &SqlitePool,
    user_id: Uuid,
    zone_id: &str,
) -> anyhow::Result<Vec<JobView>> {
    Job::list_by_user(db, user_id)
        .await?
        .into_iter()
        .map(|j| JobView::from_job(j, zone_id))
        .collect()
}

pub async fn all_jobs(db: &SqlitePool, zone_id: &str) -> anyhow::Result<Vec<JobView>> {
    Job::list_all(db)
        .await?
        .into_iter()
        .map(|j| JobView::from_job(j, zone_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::User;
    use crate::localtime::DEFAULT_ZONE;

    async fn kari(db: &SqlitePool) -> Session {
        let user = User::create(db, "Kari", "kari@x.no", "h").await.unwrap();
        Session {
            user_id: user.id,
            full_name: user.full_name,
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn submit_attributes_job_to_session_user() {
        let db = crate::db::memory().await.unwrap();
        let session = kari(&db).await;

        let job = submit(&db, &session, "Vask hytte").await.unwrap();
        assert_eq!(job.user_id, session.user_id);

        let views = jobs_for_user(&db, session.user_id, DEFAULT_ZONE).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].description, "Vask hytte");
        assert_eq!(views[0].created_at.len(), "2024-01-01 00:00:00".len());
    }

    #[tokio::test]
    async fn blank_description_is_rejected_without_insert() {
        let db = crate::db::memory().await.unwrap();
        let session = kari(&db).await;

        let err = submit(&db, &session, "   ").await.unwrap_err();
        assert!(matches!(err, JobError::EmptyDescription));
        assert!(all_jobs(&db, DEFAULT_ZONE).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stored_utc_is_shown_in_oslo_time() {
        let db = crate::db::memory().await.unwrap();
        let session = kari(&db).await;
        sqlx::query("INSERT INTO jobs (id, user_id, description, timestamp) VALUES (?, ?, ?, ?)")
            .bind(uuid::Uuid::new_v4())
            .bind(session.user_id)
            .bind("Vintervask")
            .bind("2024-01-15 12:00:00")
            .execute(&db)
            .await
            .unwrap();

        let mine = jobs_for_user(&db, session.user_id, DEFAULT_ZONE).await.unwrap();
        assert_eq!(mine[0].created_at, "2024-01-15 13:00:00");
        let all = all_jobs(&db, DEFAULT_ZONE).await.unwrap();
        assert_eq!(all[0].created_at, "2024-01-15 13:00:00");
    }
}
