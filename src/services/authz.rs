//! Authorization query surface.
//!
//! Thin, read-only composition over the permission cache. Queries have
//! no side effects; `reload_permissions` is the explicit administrative
//! trigger that rebuilds the cache from the record store.

use std::sync::Arc;

use crate::services::{PermissionCache, ServiceError};

#[derive(Clone)]
pub struct AuthorizationService {
    cache: Arc<PermissionCache>,
}

impl AuthorizationService {
    pub fn new(cache: Arc<PermissionCache>) -> Self {
        Self { cache }
    }

    /// Does `group` (name or numeric id) carry `permission`?
    pub fn has_permission(&self, group: &str, permission: &str) -> bool {
        self.cache.has_permission(group, permission)
    }

    /// Is `group` equal to, or a descendant of, `base`?
    pub fn is_group_based_on(&self, group: &str, base: &str) -> bool {
        self.cache.is_group_based_on(group, base)
    }

    /// Rebuild the permission cache wholesale. Safe to run concurrently
    /// with in-flight queries; on failure the previous state stays live.
    pub async fn reload_permissions(&self) -> Result<(), ServiceError> {
        self.cache.reload().await
    }
}
