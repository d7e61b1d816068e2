use crate::config::AppConfig;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = crate::db::connect(&config.database_url).await?;
        Ok(Self { db, config })
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }
}

impl AppState {
    /// State backed by a fresh in-memory store, for tests and demos.
    pub async fn in_memory(config: AppConfig) -> anyhow::Result<Self> {
        let db = crate::db::memory().await?;
        Ok(Self::from_parts(db, Arc::new(config)))
    }
}
