//! In-memory record store.
//!
//! Backs the test suites and embedded use without a database. Groups and
//! grants are provisioned through the administrative mutators; users go
//! through the [`RecordStore`] trait like any other store.

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::RwLock;
use subtle::ConstantTimeEq;

use super::{RecordStore, StoreError};
use crate::models::{Group, NewUser, PermissionGrant, User, UserUpdate};

#[derive(Default)]
struct Inner {
    groups: BTreeMap<i64, Group>,
    grants: BTreeMap<i64, PermissionGrant>,
    users: BTreeMap<i64, User>,
    next_user_id: i64,
    next_grant_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Provision a group with an explicit id. A root group passes its own
    /// id as `parent_id`.
    pub fn add_group(&self, id: i64, name: &str, parent_id: i64) {
        let mut inner = self.write();
        inner.groups.insert(
            id,
            Group {
                id,
                name: name.to_string(),
                parent_id,
            },
        );
    }

    /// Attach a grant to a group; ids are assigned in insertion order.
    pub fn add_grant(&self, group_id: i64, permission: &str, allow: bool) -> i64 {
        let mut inner = self.write();
        inner.next_grant_id += 1;
        let id = inner.next_grant_id;
        inner.grants.insert(
            id,
            PermissionGrant {
                id,
                group_id,
                permission: permission.to_string(),
                allow,
            },
        );
        id
    }

    /// Drop a group, as an administrative delete would.
    pub fn remove_group(&self, id: i64) {
        self.write().groups.remove(&id);
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn get_group_by_id(&self, id: i64) -> Result<Option<Group>, StoreError> {
        Ok(self.read().groups.get(&id).cloned())
    }

    async fn get_all_groups(&self) -> Result<Vec<Group>, StoreError> {
        Ok(self.read().groups.values().cloned().collect())
    }

    async fn get_grants_for_group(
        &self,
        group_id: i64,
    ) -> Result<Vec<PermissionGrant>, StoreError> {
        Ok(self
            .read()
            .grants
            .values()
            .filter(|g| g.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.read().users.get(&id).cloned())
    }

    async fn get_user_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()
            .users
            .values()
            .find(|u| u.name == name)
            .cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn get_user_by_refresh_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()
            .users
            .values()
            .find(|u| {
                u.refresh_token
                    .as_deref()
                    .map(|stored| bool::from(stored.as_bytes().ct_eq(token.as_bytes())))
                    .unwrap_or(false)
            })
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.write();
        if inner.users.values().any(|u| u.name == user.name) {
            return Err(StoreError::Duplicate("name".to_string()));
        }
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("email".to_string()));
        }

        inner.next_user_id += 1;
        let record = User {
            id: inner.next_user_id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            group_id: user.group_id,
            refresh_token: None,
            last_login: None,
            last_refresh_token_issued: None,
            last_access_token_issued: None,
            last_password_changed: None,
            registered_at: Utc::now(),
        };
        inner.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_user(&self, id: i64, update: UserUpdate) -> Result<u64, StoreError> {
        let mut inner = self.write();
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(0);
        };

        if let Some(hash) = update.password_hash {
            user.password_hash = hash;
        }
        if let Some(token) = update.refresh_token {
            user.refresh_token = Some(token);
        }
        if let Some(at) = update.last_login {
            user.last_login = Some(at);
        }
        if let Some(at) = update.last_refresh_token_issued {
            user.last_refresh_token_issued = Some(at);
        }
        if let Some(at) = update.last_access_token_issued {
            user.last_access_token_issued = Some(at);
        }
        if let Some(at) = update.last_password_changed {
            user.last_password_changed = Some(at);
        }
        Ok(1)
    }
}
