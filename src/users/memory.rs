use std::collections::BTreeMap;
use std::sync::Mutex;

use axum::async_trait;
use time::OffsetDateTime;

use crate::users::repo::UserStore;
use crate::users::repo_types::{NewUser, User, UserChanges};

/// In-process `UserStore` with the same constraints as the `users` table:
/// non-null name and email, unique email, auto-increment ids.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i32,
    rows: BTreeMap<i32, User>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| anyhow::anyhow!("user store lock poisoned"))
    }
}

impl Inner {
    fn ensure_unique_email(&self, email: &str, except: Option<i32>) -> anyhow::Result<()> {
        let taken = self
            .rows
            .values()
            .any(|u| u.email == email && Some(u.id) != except);
        if taken {
            anyhow::bail!("Duplicate entry '{email}' for key 'users_email_unique'");
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.lock()?.rows.values().cloned().collect())
    }

    async fn find(&self, id: i32) -> anyhow::Result<Option<User>> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    async fn insert(&self, user: &NewUser) -> anyhow::Result<i32> {
        let mut inner = self.lock()?;
        inner.ensure_unique_email(&user.email, None)?;

        let id = inner.last_id + 1;
        let now = OffsetDateTime::now_utc();
        inner.rows.insert(
            id,
            User {
                id,
                name: user.name.clone(),
                email: user.email.clone(),
                age: user.age,
                created_at: Some(now),
                updated_at: Some(now),
            },
        );
        inner.last_id = id;
        Ok(id)
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> anyhow::Result<u64> {
        let mut inner = self.lock()?;
        if !inner.rows.contains_key(&id) {
            return Ok(0);
        }
        let name = changes
            .name
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Column 'name' cannot be null"))?;
        let email = changes
            .email
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Column 'email' cannot be null"))?;
        inner.ensure_unique_email(&email, Some(id))?;

        if let Some(row) = inner.rows.get_mut(&id) {
            row.name = name;
            row.email = email;
            row.age = changes.age;
            row.updated_at = Some(changes.updated_at);
        }
        Ok(1)
    }

    async fn delete(&self, id: i32) -> anyhow::Result<u64> {
        Ok(self.lock()?.rows.remove(&id).map_or(0, |_| 1))
    }
}
