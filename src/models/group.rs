//! Group model - nodes of the permission-inheritance hierarchy.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Group id assigned to newly registered users when no override is configured.
pub const REGISTERED_GROUP_ID: i64 = 1;

/// Group id of the built-in administrator group.
pub const ADMINISTRATOR_GROUP_ID: i64 = 2;

/// A group in the inheritance hierarchy.
///
/// The parent relation terminates at a root group whose `parent_id`
/// references its own `id`. Any other repeated id along a chain is a
/// data-integrity fault, not a valid terminator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub parent_id: i64,
}

impl Group {
    /// A root group is its own parent.
    pub fn is_root(&self) -> bool {
        self.parent_id == self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_self_parented() {
        let root = Group {
            id: 1,
            name: "registered".to_string(),
            parent_id: 1,
        };
        assert!(root.is_root());

        let child = Group {
            id: 2,
            name: "administrator".to_string(),
            parent_id: 1,
        };
        assert!(!child.is_root());
    }
}
