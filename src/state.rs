use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::config::AppConfig;
use crate::users::{PgUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    /// Connects to Postgres and, unless disabled, applies the embedded migrations.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect_with(config.database.connect_options()?)
            .await
            .context("connect to database")?;
        tracing::info!(
            host = %config.database.host,
            database = %config.database.name,
            "connected to database"
        );

        if config.run_migrations {
            sqlx::migrate!("./migrations")
                .run(&db)
                .await
                .context("run migrations")?;
        }

        Ok(Self::from_store(Arc::new(PgUserStore::new(db))))
    }

    pub fn from_store(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Closes the store. The state must not be used afterwards.
    pub async fn shutdown(&self) {
        self.users.close().await;
        tracing::info!("user store closed");
    }
}
