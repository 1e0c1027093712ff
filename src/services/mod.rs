//! Services layer.
//!
//! Business logic of the authorization and credential core: hierarchy
//! resolution, the permission cache, the authorization query surface,
//! and the credential lifecycle.

mod auth;
mod authz;
pub mod error;
mod hierarchy;
mod jwt;
mod permissions;

pub use auth::AuthService;
pub use authz::AuthorizationService;
pub use error::ServiceError;
pub use hierarchy::GroupHierarchy;
pub use jwt::{AccessTokenClaims, JwtService};
pub use permissions::PermissionCache;
