//! User repository
//!
//! Uniqueness of `user_name` and `keycloak_id` is enforced by unique
//! indexes; a losing concurrent writer observes `AppError::Conflict`
//! instead of overwriting.

use crate::domain::scim::ListFilter;
use crate::domain::{User, UserChanges, UserDraft};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;

const USER_COLUMNS: &str =
    "id, user_name, email, name, external_id, active, keycloak_id, created_at, updated_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, draft: &UserDraft) -> Result<User>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>>;
    async fn find_by_keycloak_id(&self, keycloak_id: &str) -> Result<Option<User>>;
    /// Conflict probe for replace: another record (different id) owning the
    /// handle.
    async fn find_user_name_conflict(&self, user_name: &str, exclude_id: i64)
        -> Result<Option<User>>;
    async fn list(&self, filter: &ListFilter, offset: i64, limit: i64) -> Result<Vec<User>>;
    async fn count(&self, filter: &ListFilter) -> Result<i64>;
    async fn update(&self, id: i64, changes: &UserChanges) -> Result<User>;
    async fn delete(&self, id: i64) -> Result<()>;
}

pub struct UserRepositoryImpl {
    pool: MySqlPool,
}

impl UserRepositoryImpl {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error, detail: &str) -> AppError {
    if let sqlx::Error::Database(ref db) = e {
        if db.is_unique_violation() {
            return AppError::Conflict(detail.to_string());
        }
    }
    AppError::Database(e)
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    async fn create(&self, draft: &UserDraft) -> Result<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (user_name, email, name, external_id, active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, NOW(3), NOW(3))
            "#,
        )
        .bind(&draft.user_name)
        .bind(&draft.email)
        .bind(&draft.name)
        .bind(&draft.external_id)
        .bind(draft.active)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_write_error(
                e,
                &format!("User with userName '{}' already exists", draft.user_name),
            )
        })?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to create user")))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_user_name(&self, user_name: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_name = ?"
        ))
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_keycloak_id(&self, keycloak_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE keycloak_id = ?"
        ))
        .bind(keycloak_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_name_conflict(
        &self,
        user_name: &str,
        exclude_id: i64,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_name = ? AND id != ?"
        ))
        .bind(user_name)
        .bind(exclude_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list(&self, filter: &ListFilter, offset: i64, limit: i64) -> Result<Vec<User>> {
        let users = match filter {
            ListFilter::UserNameEq(user_name) => {
                sqlx::query_as::<_, User>(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE user_name = ? ORDER BY id ASC LIMIT ? OFFSET ?"
                ))
                .bind(user_name)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            ListFilter::All | ListFilter::Unsupported => {
                sqlx::query_as::<_, User>(&format!(
                    "SELECT {USER_COLUMNS} FROM users ORDER BY id ASC LIMIT ? OFFSET ?"
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(users)
    }

    async fn count(&self, filter: &ListFilter) -> Result<i64> {
        let row: (i64,) = match filter {
            ListFilter::UserNameEq(user_name) => {
                sqlx::query_as("SELECT COUNT(*) FROM users WHERE user_name = ?")
                    .bind(user_name)
                    .fetch_one(&self.pool)
                    .await?
            }
            ListFilter::All | ListFilter::Unsupported => {
                sqlx::query_as("SELECT COUNT(*) FROM users")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(row.0)
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<User> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

        let user_name = changes.user_name.as_ref().unwrap_or(&existing.user_name);
        let email = changes.email.as_ref().or(existing.email.as_ref());
        let name = changes.name.as_ref().or(existing.name.as_ref());
        let external_id = changes.external_id.as_ref().or(existing.external_id.as_ref());
        let active = changes.active.unwrap_or(existing.active);
        let keycloak_id = changes.keycloak_id.as_ref().or(existing.keycloak_id.as_ref());

        sqlx::query(
            r#"
            UPDATE users
            SET user_name = ?, email = ?, name = ?, external_id = ?, active = ?, keycloak_id = ?, updated_at = NOW(3)
            WHERE id = ?
            "#,
        )
        .bind(user_name)
        .bind(email)
        .bind(name)
        .bind(external_id)
        .bind(active)
        .bind(keycloak_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "userName or keycloakId already in use"))?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to update user")))
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }

        Ok(())
    }
}
