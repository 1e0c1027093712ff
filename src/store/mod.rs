//! Record store contract.
//!
//! The core consumes groups, permission grants, and users through this
//! narrow query surface; durability and uniqueness constraints belong to
//! the implementing store. Every store failure is wrapped into
//! [`StoreError`] here so callers never see a raw driver error.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Group, NewUser, PermissionGrant, User, UserUpdate};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Uniqueness violation on create (duplicate name or email).
    #[error("duplicate value for {0}")]
    Duplicate(String),

    /// Transport or connection failure. Never retried by the core.
    #[error("record store unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_group_by_id(&self, id: i64) -> Result<Option<Group>, StoreError>;

    async fn get_all_groups(&self) -> Result<Vec<Group>, StoreError>;

    async fn get_grants_for_group(&self, group_id: i64)
        -> Result<Vec<PermissionGrant>, StoreError>;

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn get_user_by_name(&self, name: &str) -> Result<Option<User>, StoreError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn get_user_by_refresh_token(&self, token: &str) -> Result<Option<User>, StoreError>;

    /// Create a user, raising [`StoreError::Duplicate`] when the name or
    /// email is already taken.
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    /// Apply a partial update by id and return the affected row count.
    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<u64, StoreError>;
}
