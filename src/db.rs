use std::path::Path;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

use crate::{
    auth::password::hash_password,
    config::{AdminSeed, AppConfig},
};

pub async fn connect(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    if let Some(dir) = Path::new(&config.database_path).parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create database directory {}", dir.display()))?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(&config.database_path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("open database {}", config.database_path))?;
    info!(path = %config.database_path, "database opened");
    Ok(pool)
}

/// Creates the `users` table if it is missing.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("run migrations")?;
    Ok(())
}

/// Inserts the default account; a no-op when the name or email is taken.
pub async fn seed_admin(pool: &SqlitePool, admin: &AdminSeed) -> anyhow::Result<()> {
    let hash = hash_password(&admin.password)?;
    let res = sqlx::query(
        r#"
        INSERT OR IGNORE INTO users (name, password_hash, email)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&admin.name)
    .bind(&hash)
    .bind(admin.email.as_deref())
    .execute(pool)
    .await
    .context("seed default user")?;

    if res.rows_affected() > 0 {
        info!(name = %admin.name, "default user created");
    }
    Ok(())
}
