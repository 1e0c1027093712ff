//! PostgreSQL record store adapter.

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::QueryBuilder;
use std::time::Duration;

use super::{RecordStore, StoreError};
use crate::config::DatabaseConfig;
use crate::models::{Group, NewUser, PermissionGrant, User, UserUpdate};

/// Record store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect and build the pool.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(&config.url)
            .await
            .map_err(wrap)?;

        tracing::info!("Successfully connected to PostgreSQL");

        Ok(Self { pool })
    }

    /// Wrap an existing pool (shared with other parts of the process).
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(wrap)?;
        Ok(())
    }
}

fn wrap(err: sqlx::Error) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            let field = db_err.constraint().unwrap_or("unique key").to_string();
            return StoreError::Duplicate(field);
        }
    }
    StoreError::Unavailable(anyhow::Error::new(err))
}

const USER_COLUMNS: &str = "id, name, email, password_hash, group_id, refresh_token, \
     last_login, last_refresh_token_issued, last_access_token_issued, \
     last_password_changed, registered_at";

#[async_trait::async_trait]
impl RecordStore for PgStore {
    async fn get_group_by_id(&self, id: i64) -> Result<Option<Group>, StoreError> {
        sqlx::query_as::<_, Group>("SELECT id, name, parent_id FROM groups WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(wrap)
    }

    async fn get_all_groups(&self) -> Result<Vec<Group>, StoreError> {
        sqlx::query_as::<_, Group>("SELECT id, name, parent_id FROM groups ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(wrap)
    }

    async fn get_grants_for_group(
        &self,
        group_id: i64,
    ) -> Result<Vec<PermissionGrant>, StoreError> {
        sqlx::query_as::<_, PermissionGrant>(
            "SELECT id, group_id, permission, allow FROM permission_grants \
             WHERE group_id = $1 ORDER BY id",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(wrap)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(wrap)
    }

    async fn get_user_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(wrap)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(wrap)
    }

    async fn get_user_by_refresh_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE refresh_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(wrap)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password_hash, group_id, registered_at) \
             VALUES ($1, $2, $3, $4, now()) RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.group_id)
        .fetch_one(&self.pool)
        .await
        .map_err(wrap)
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<u64, StoreError> {
        if update.is_empty() {
            // Nothing to write; report whether the row exists so callers
            // keep their affected-count semantics.
            return Ok(self.get_user_by_id(id).await?.map_or(0, |_| 1));
        }

        let mut builder = QueryBuilder::<sqlx::Postgres>::new("UPDATE users SET ");
        let mut fields = builder.separated(", ");
        if let Some(hash) = &update.password_hash {
            fields.push("password_hash = ").push_bind_unseparated(hash);
        }
        if let Some(token) = &update.refresh_token {
            fields.push("refresh_token = ").push_bind_unseparated(token);
        }
        if let Some(at) = update.last_login {
            fields.push("last_login = ").push_bind_unseparated(at);
        }
        if let Some(at) = update.last_refresh_token_issued {
            fields
                .push("last_refresh_token_issued = ")
                .push_bind_unseparated(at);
        }
        if let Some(at) = update.last_access_token_issued {
            fields
                .push("last_access_token_issued = ")
                .push_bind_unseparated(at);
        }
        if let Some(at) = update.last_password_changed {
            fields
                .push("last_password_changed = ")
                .push_bind_unseparated(at);
        }
        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(&self.pool).await.map_err(wrap)?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires running PostgreSQL
    async fn test_connect() {
        let config = DatabaseConfig {
            url: "postgres://localhost/auth_core_test".to_string(),
            max_connections: 5,
            min_connections: 1,
        };

        let result = PgStore::connect(&config).await;
        assert!(result.is_ok());
    }
}
