//! Permission cache.
//!
//! Holds the resolved permission set of every known group, built by
//! folding allow/deny grants along each group's ancestor chain. Lookups
//! read the currently published snapshot without blocking; `reload`
//! rebuilds a fresh snapshot off to the side and publishes it with one
//! atomic swap, so a concurrent reader sees either the entirely old or
//! entirely new state.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::models::WILDCARD;
use crate::services::{GroupHierarchy, ServiceError};
use crate::store::RecordStore;

/// Resolved state of one group. Shared by the id and name keys of the
/// snapshot, so both lookups observe the same set instance.
struct GroupEntry {
    /// Effective permission names after the root-to-self grant fold.
    permissions: HashSet<String>,
    /// Names of every group in the closure, the group itself included.
    closure_names: HashSet<String>,
}

#[derive(Default)]
struct Snapshot {
    by_id: HashMap<i64, Arc<GroupEntry>>,
    by_name: HashMap<String, Arc<GroupEntry>>,
}

pub struct PermissionCache {
    store: Arc<dyn RecordStore>,
    hierarchy: GroupHierarchy,
    snapshot: RwLock<Arc<Snapshot>>,
}

impl PermissionCache {
    /// An empty cache; call [`reload`](Self::reload) to populate it.
    pub fn new(store: Arc<dyn RecordStore>, max_depth: usize) -> Self {
        Self {
            hierarchy: GroupHierarchy::new(store.clone(), max_depth),
            store,
            snapshot: RwLock::new(Arc::new(Snapshot::default())),
        }
    }

    /// Rebuild the resolved permission sets for all groups and publish
    /// the result atomically.
    ///
    /// Any per-group failure (a group deleted mid-rebuild, a hierarchy
    /// cycle, a store outage) aborts the whole rebuild and leaves the
    /// previous snapshot active.
    pub async fn reload(&self) -> Result<(), ServiceError> {
        let groups = self.store.get_all_groups().await?;

        let mut next = Snapshot::default();
        for group in &groups {
            let entry = Arc::new(self.resolve_group(group.id).await?);
            next.by_id.insert(group.id, entry.clone());
            next.by_name.insert(group.name.clone(), entry);
        }

        let mut published = self.snapshot.write().unwrap_or_else(|e| e.into_inner());
        *published = Arc::new(next);
        drop(published);

        tracing::info!(groups = groups.len(), "permission cache rebuilt");
        Ok(())
    }

    /// Resolve one group: closure, then grants in root-to-self order so
    /// a closer group's grant always overrides an inherited one. Within
    /// one group, grants apply in ascending id order.
    async fn resolve_group(&self, group_id: i64) -> Result<GroupEntry, ServiceError> {
        let closure = self.hierarchy.closure_of(group_id).await?;

        let mut permissions = HashSet::new();
        for group in closure.iter().rev() {
            let mut grants = self.store.get_grants_for_group(group.id).await?;
            grants.sort_by_key(|grant| grant.id);
            for grant in grants {
                if grant.allow {
                    permissions.insert(grant.permission);
                } else {
                    permissions.remove(&grant.permission);
                }
            }
        }

        let closure_names = closure.into_iter().map(|group| group.name).collect();

        Ok(GroupEntry {
            permissions,
            closure_names,
        })
    }

    fn current(&self) -> Arc<Snapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Lookup by group name, falling back to a numeric group id.
    fn entry_for(&self, group: &str) -> Option<Arc<GroupEntry>> {
        let snapshot = self.current();
        if let Some(entry) = snapshot.by_name.get(group) {
            return Some(entry.clone());
        }
        group
            .parse::<i64>()
            .ok()
            .and_then(|id| snapshot.by_id.get(&id).cloned())
    }

    /// Does the group effectively hold the permission?
    ///
    /// The wildcard permission is always granted; a group unknown to the
    /// current snapshot holds nothing.
    pub fn has_permission(&self, group: &str, permission: &str) -> bool {
        if permission == WILDCARD {
            return true;
        }
        self.entry_for(group)
            .map(|entry| entry.permissions.contains(permission))
            .unwrap_or(false)
    }

    /// Is `group` equal to, or a descendant of, `base`?
    ///
    /// The wildcard base expresses "no group restriction" and is always
    /// true; an unknown group is based on nothing.
    pub fn is_group_based_on(&self, group: &str, base: &str) -> bool {
        if base == WILDCARD {
            return true;
        }
        self.entry_for(group)
            .map(|entry| entry.closure_names.contains(base))
            .unwrap_or(false)
    }
}
