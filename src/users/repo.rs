use anyhow::Context;
use axum::async_trait;

use crate::db::Database;
use crate::users::repo_types::{NewUser, User, UserChanges};

/// Storage seam for the user handlers.
///
/// `update` and `delete` return the affected row count; zero means the id
/// matched nothing.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<User>>;
    async fn find(&self, id: i32) -> anyhow::Result<Option<User>>;
    async fn insert(&self, user: &NewUser) -> anyhow::Result<i32>;
    async fn update(&self, id: i32, changes: &UserChanges) -> anyhow::Result<u64>;
    async fn delete(&self, id: i32) -> anyhow::Result<u64>;
}

#[derive(Clone)]
pub struct MySqlUserStore {
    db: Database,
}

impl MySqlUserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for MySqlUserStore {
    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, age, created_at, updated_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(self.db.pool())
        .await
        .context("select users")?;
        Ok(rows)
    }

    async fn find(&self, id: i32) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, age, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await
        .context("select user by id")?;
        Ok(user)
    }

    async fn insert(&self, user: &NewUser) -> anyhow::Result<i32> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, age)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.age)
        .execute(self.db.pool())
        .await
        .context("insert user")?;

        let id = i32::try_from(result.last_insert_id())
            .context("insert id does not fit users.id")?;
        Ok(id)
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> anyhow::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE users
               SET name = ?, email = ?, age = ?, updated_at = ?
             WHERE id = ?
            "#,
        )
        .bind(changes.name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.age)
        .bind(changes.updated_at)
        .bind(id)
        .execute(self.db.pool())
        .await
        .context("update user")?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i32) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await
            .context("delete user")?;
        Ok(result.rows_affected())
    }
}
