//! Authorization and credential core of the user-management service.
//!
//! Resolves whether a group is permitted to act through a hierarchy of
//! group inheritance and permission overrides, and manages the login
//! credential lifecycle: password verification, access-token issuance,
//! refresh-token rotation.
//!
//! The RPC transport, message encoding, and connection pooling to the
//! record store live in collaborating crates; this one exposes plain
//! `Result`-returning async operations for them to adapt:
//! `register`, `login`, `issue_access_token`, `verify_access_token`,
//! `change_password` on [`AuthService`], and `has_permission`,
//! `is_group_based_on`, `reload_permissions` on
//! [`AuthorizationService`].

pub mod config;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

pub use services::{
    AccessTokenClaims, AuthService, AuthorizationService, GroupHierarchy, JwtService,
    PermissionCache, ServiceError,
};
pub use store::{MemoryStore, PgStore, RecordStore, StoreError};
