use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::jobs::repo_types::Job;
use crate::localtime;

/// JSON body for `POST /order`.
#[derive(Debug, Deserialize)]
pub struct OrderRequest {
    pub description: String,
}

/// A job ready for display, timestamp already in local time.
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub created_at: String,
}

impl JobView {
    pub fn from_job(job: Job, zone_id: &str) -> anyhow::Result<Self> {
        let created_at = localtime::format_local(job.created_at_utc(), zone_id)?;
        Ok(Self {
            id: job.id,
            user_id: job.user_id,
            description: job.description,
            created_at,
        })
    }
}
