//! Shared fixtures for the integration tests.
//!
//! Builds the core services over a seeded in-memory record store, the
//! way an embedding process would wire them over PostgreSQL.

#![allow(dead_code)]

use std::sync::Arc;

use auth_core::config::JwtConfig;
use auth_core::models::REGISTERED_GROUP_ID;
use auth_core::{
    AuthService, AuthorizationService, JwtService, MemoryStore, PermissionCache, RecordStore,
};

pub const TEST_SECRET: &str = "integration-test-access-token-secret";

/// Low hashing cost keeps the suite fast; verification is cost-agnostic.
pub const TEST_PASSWORD_COST: u32 = 2;

pub const TEST_MAX_DEPTH: usize = 32;

pub struct TestCore {
    pub store: Arc<MemoryStore>,
    pub cache: Arc<PermissionCache>,
    pub auth: AuthService,
    pub authz: AuthorizationService,
}

pub fn jwt_service(expiry_minutes: i64) -> JwtService {
    JwtService::new(&JwtConfig {
        secret: TEST_SECRET.to_string(),
        access_token_expiry_minutes: expiry_minutes,
    })
}

/// Baseline hierarchy:
///
/// ```text
/// registered (1, root)
/// └── administrator (2)
///     └── moderator (3)
/// ```
pub fn seed_groups(store: &MemoryStore) {
    store.add_group(1, "registered", 1);
    store.add_group(2, "administrator", 1);
    store.add_group(3, "moderator", 2);
}

pub fn build_core(access_token_expiry_minutes: i64) -> TestCore {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let store = Arc::new(MemoryStore::new());
    seed_groups(&store);

    let record_store: Arc<dyn RecordStore> = store.clone();
    let cache = Arc::new(PermissionCache::new(record_store.clone(), TEST_MAX_DEPTH));
    let auth = AuthService::new(
        record_store,
        jwt_service(access_token_expiry_minutes),
        TEST_PASSWORD_COST,
        REGISTERED_GROUP_ID,
    );
    let authz = AuthorizationService::new(cache.clone());

    TestCore {
        store,
        cache,
        auth,
        authz,
    }
}

/// Core with the standard 5-minute access-token expiry.
pub fn setup() -> TestCore {
    build_core(5)
}
