use std::fmt;

use anyhow::Context;
use sqlx::postgres::PgConnectOptions;

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

// Keeps the password out of logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        if let Some(url) = &self.url {
            return url.parse().context("parse DATABASE_URL");
        }
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub public_dir: String,
    pub run_migrations: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to touch
    /// the process environment.
    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| get(key).with_context(|| format!("{key} must be set"));

        let url = get("DATABASE_URL").filter(|v| !v.is_empty());
        let (user, name) = if url.is_some() {
            (get("DB_USER").unwrap_or_default(), get("DB_NAME").unwrap_or_default())
        } else {
            (require("DB_USER")?, require("DB_NAME")?)
        };

        let database = DatabaseConfig {
            url,
            host: get("DB_HOST").unwrap_or_else(|| "localhost".into()),
            port: parse_or(get("DB_PORT"), 5432, "DB_PORT")?,
            user,
            password: get("DB_PASS").unwrap_or_default(),
            name,
            max_connections: parse_or(get("DB_MAX_CONNECTIONS"), 1, "DB_MAX_CONNECTIONS")?,
        };

        Ok(Self {
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(get("PORT").or_else(|| get("APP_PORT")), 8080, "PORT")?,
            database,
            public_dir: get("PUBLIC_DIR").unwrap_or_else(|| "public".into()),
            run_migrations: get("RUN_MIGRATIONS")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),
        })
    }
}

fn parse_or<T>(raw: Option<String>, default: T, key: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(v) => v.trim().parse().with_context(|| format!("invalid {key}: {v}")),
        None => Ok(default),
    }
}
