use thiserror::Error;

use crate::store::StoreError;

/// Failure kinds surfaced by every public operation of the core.
///
/// Each operation resolves to either a success payload or exactly one of
/// these; raw store errors never leak past this boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("group not found: {0}")]
    GroupNotFound(i64),

    #[error("user not found")]
    UserNotFound,

    #[error("duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("password mismatch")]
    PasswordMismatch,

    #[error("refresh token is not valid")]
    InvalidRefreshToken,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Data-integrity guard: a non-root group id repeated in an ancestor
    /// chain, or a chain longer than the configured maximum.
    #[error("group hierarchy cycle detected at group {0}")]
    HierarchyCycleDetected(i64),

    #[error("record store unavailable: {0}")]
    StoreUnavailable(#[source] anyhow::Error),

    #[error("internal error: {0}")]
    Internal(anyhow::Error),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(field) => ServiceError::DuplicateEntry(field),
            StoreError::Unavailable(e) => ServiceError::StoreUnavailable(e),
        }
    }
}
