pub mod grant;
pub mod group;
pub mod user;

pub use grant::PermissionGrant;
pub use group::{Group, ADMINISTRATOR_GROUP_ID, REGISTERED_GROUP_ID};
pub use user::{LoginResponse, NewUser, TokenIdentity, User, UserProfile, UserUpdate};

/// Sentinel accepted wherever a permission or base group is named, meaning
/// "unconditionally true". A protocol-level wildcard, never a stored grant.
pub const WILDCARD: &str = "*";
