use anyhow::Context;
use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
    MySqlPool,
};
use tracing::{error, info};

use crate::config::DbConfig;

/// Database handle owned by the hosting application.
///
/// Opened once at startup, cloned into every handler through `AppState`,
/// and closed on shutdown. A failed `open` leaves nothing behind, so the
/// next call starts over.
#[derive(Clone, Debug)]
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    pub async fn open(cfg: &DbConfig) -> anyhow::Result<Self> {
        let options = MySqlConnectOptions::new()
            .host(&cfg.host)
            .port(cfg.port)
            .username(&cfg.user)
            .password(&cfg.password)
            .database(&cfg.name);

        let pool = MySqlPoolOptions::new()
            .max_connections(cfg.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                error!(error = %e, host = %cfg.host, port = cfg.port, "database connection failed");
                e
            })
            .context("connect to database")?;

        info!(host = %cfg.host, port = cfg.port, database = %cfg.name, "database connected");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("database connection closed");
    }
}
