use sqlx::FromRow;
use time::{OffsetDateTime, PrimitiveDateTime};
use uuid::Uuid;

/// Job record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    #[sqlx(rename = "timestamp")]
    pub created_at: PrimitiveDateTime, // set by the store, always UTC
}

impl Job {
    pub fn created_at_utc(&self) -> OffsetDateTime {
        self.created_at.assume_utc()
    }
}
