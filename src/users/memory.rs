//! In-process `UserStore` with the same contract as the Postgres one.
//!
//! Rows are kept in insertion order, ids start at 1 and are never reused.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::users::repo::{StoreError, UserStore};
use crate::users::repo_types::{parse_date, NewUser, User, UserChanges, UserSummary};

#[derive(Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<i64, User>,
}

#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn coerce_date(raw: &str) -> Result<time::Date, StoreError> {
    parse_date(raw).map_err(|_| StoreError::InvalidDate(raw.to_string()))
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<UserSummary>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.values().cloned().map(UserSummary::from).collect())
    }

    async fn find(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().await.rows.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<i64, StoreError> {
        let birth_date = coerce_date(&user.birth_date)?;
        let mut inner = self.inner.lock().await;
        inner.next_id += 1;
        let id = inner.next_id;
        inner.rows.insert(
            id,
            User {
                id,
                email: user.email,
                password: user.password_hash,
                first_name: user.first_name,
                last_name: user.last_name,
                birth_date,
            },
        );
        Ok(id)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<bool, StoreError> {
        if changes.is_empty() {
            return Err(StoreError::EmptyUpdate);
        }
        // Coerce before touching the row so a bad date leaves it unmodified.
        let birth_date = changes.birth_date.as_deref().map(coerce_date).transpose()?;

        let mut inner = self.inner.lock().await;
        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(false);
        };
        if let Some(email) = changes.email {
            row.email = email;
        }
        if let Some(hash) = changes.password_hash {
            row.password = hash;
        }
        if let Some(first_name) = changes.first_name {
            row.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            row.last_name = last_name;
        }
        if let Some(birth_date) = birth_date {
            row.birth_date = birth_date;
        }
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.lock().await.rows.remove(&id).is_some())
    }
}
