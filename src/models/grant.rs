//! Permission grant model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named permission attached to a single group.
///
/// `allow = false` is an explicit deny marker that removes an inherited
/// permission; it is not the same as the grant being absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PermissionGrant {
    pub id: i64,
    pub group_id: i64,
    pub permission: String,
    pub allow: bool,
}
