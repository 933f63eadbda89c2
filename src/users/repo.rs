use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use tracing::debug;

use crate::users::repo_types::{NewUser, User, UserChanges, UserSummary};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store could not coerce the value into a calendar date.
    #[error("invalid date value: {0}")]
    InvalidDate(String),

    #[error("update with no columns")]
    EmptyUpdate,
}

/// Persistence for the users table. Every method issues at most one statement.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All rows, in storage default order.
    async fn list(&self) -> Result<Vec<UserSummary>, StoreError>;

    async fn find(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Inserts a row and returns its generated id.
    async fn create(&self, user: NewUser) -> Result<i64, StoreError>;

    /// Returns `false` when no row has this id.
    async fn update(&self, id: i64, changes: UserChanges) -> Result<bool, StoreError>;

    /// Returns `false` when no row has this id.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// Releases the underlying connections. Called once at shutdown.
    async fn close(&self) {}
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> Result<Vec<UserSummary>, StoreError> {
        let rows = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, email, first_name, last_name, birth_date
            FROM users
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, first_name, last_name, birth_date
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<i64, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, password, first_name, last_name, birth_date)
            VALUES ($1, $2, $3, $4, $5::date)
            RETURNING id
            "#,
        )
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.birth_date)
        .fetch_one(&self.pool)
        .await?;
        debug!(user_id = id, "user row inserted");
        Ok(id)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<bool, StoreError> {
        if changes.is_empty() {
            return Err(StoreError::EmptyUpdate);
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(email) = changes.email {
                set.push("email = ").push_bind_unseparated(email);
            }
            if let Some(hash) = changes.password_hash {
                set.push("password = ").push_bind_unseparated(hash);
            }
            if let Some(first_name) = changes.first_name {
                set.push("first_name = ").push_bind_unseparated(first_name);
            }
            if let Some(last_name) = changes.last_name {
                set.push("last_name = ").push_bind_unseparated(last_name);
            }
            if let Some(birth_date) = changes.birth_date {
                set.push("birth_date = ")
                    .push_bind_unseparated(birth_date)
                    .push_unseparated("::date");
            }
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
