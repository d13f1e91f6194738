use std::sync::Arc;

use anyhow::Context;
use sqlx::{pool::PoolConnection, Sqlite, SqlitePool};

use crate::{config::AppConfig, db, error::AppResult};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let db = db::connect(&config).await?;
        db::migrate(&db).await?;
        if let Some(admin) = &config.admin {
            db::seed_admin(&db, admin).await?;
        }
        Ok(Self { db, config })
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>) -> Self {
        Self { db, config }
    }

    /// One connection for the current request; returned to the pool when
    /// the guard drops.
    pub async fn acquire(&self) -> AppResult<PoolConnection<Sqlite>> {
        let conn = self
            .db
            .acquire()
            .await
            .context("acquire database connection")?;
        Ok(conn)
    }
}
