//! Group hierarchy resolver.
//!
//! Computes the ordered ancestor chain (closure) of a group: the group
//! itself, then each parent in turn, stopping at the root — the group
//! whose parent is itself.

use std::collections::HashSet;
use std::sync::Arc;

use crate::models::Group;
use crate::services::ServiceError;
use crate::store::RecordStore;

#[derive(Clone)]
pub struct GroupHierarchy {
    store: Arc<dyn RecordStore>,
    max_depth: usize,
}

impl GroupHierarchy {
    pub fn new(store: Arc<dyn RecordStore>, max_depth: usize) -> Self {
        Self { store, max_depth }
    }

    /// Ordered closure `[self, parent, ..., root]` of a group.
    ///
    /// Fails with `GroupNotFound` when any id along the walk is missing
    /// from the store, and with `HierarchyCycleDetected` when a non-root
    /// id repeats or the chain exceeds the configured maximum depth.
    pub async fn closure_of(&self, group_id: i64) -> Result<Vec<Group>, ServiceError> {
        let mut chain: Vec<Group> = Vec::new();
        let mut seen: HashSet<i64> = HashSet::new();

        let mut current = self
            .store
            .get_group_by_id(group_id)
            .await?
            .ok_or(ServiceError::GroupNotFound(group_id))?;

        loop {
            if !seen.insert(current.id) {
                tracing::warn!(
                    group_id,
                    repeated_id = current.id,
                    "group hierarchy contains a non-root cycle"
                );
                return Err(ServiceError::HierarchyCycleDetected(current.id));
            }
            if chain.len() >= self.max_depth {
                // Safety net against store corruption the seen-set missed
                // (e.g. an effectively unbounded chain of fresh ids).
                tracing::warn!(
                    group_id,
                    max_depth = self.max_depth,
                    "group hierarchy exceeds maximum depth"
                );
                return Err(ServiceError::HierarchyCycleDetected(current.id));
            }

            let is_root = current.is_root();
            let parent_id = current.parent_id;
            chain.push(current);

            if is_root {
                break;
            }

            current = self
                .store
                .get_group_by_id(parent_id)
                .await?
                .ok_or(ServiceError::GroupNotFound(parent_id))?;
        }

        Ok(chain)
    }
}
