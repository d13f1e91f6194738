use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

/// Account created on startup when the table has no user with this name.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    pub name: String,
    pub password: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub filter: String,
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_path: String,
    pub max_connections: u32,
    pub admin: Option<AdminSeed>,
    pub listen_addr: SocketAddr,
    pub log: LogConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_path = env_or("DATABASE_PATH", "instance/users.db");
        let max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(v) => v
                .parse::<u32>()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS={v} is not a number"))?,
            Err(_) => 5,
        };
        let seed_admin = match std::env::var("SEED_ADMIN") {
            Ok(v) => v
                .parse::<bool>()
                .with_context(|| format!("SEED_ADMIN={v} is not true/false"))?,
            Err(_) => true,
        };
        let admin = seed_admin.then(|| AdminSeed {
            name: env_or("ADMIN_NAME", "admin"),
            password: env_or("ADMIN_PASSWORD", "adminpass"),
            email: Some(env_or("ADMIN_EMAIL", "admin@example.com")).filter(|e| !e.is_empty()),
        });

        let host = env_or("APP_HOST", "0.0.0.0");
        let port = env_or("APP_PORT", "8080");
        let listen_addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .with_context(|| format!("APP_HOST/APP_PORT {host}:{port} is not a socket address"))?;

        let log = LogConfig {
            filter: env_or("RUST_LOG", "user_api=debug,axum=info,tower_http=info"),
            json: std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false),
        };

        Ok(Self {
            database_path,
            max_connections,
            admin,
            listen_addr,
            log,
        })
    }
}
