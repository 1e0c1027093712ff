//! Permission cache: inheritance, override precedence, wildcard
//! handling, and snapshot consistency across failed rebuilds.

mod common;

use auth_core::ServiceError;

#[tokio::test]
async fn test_descendant_deny_overrides_ancestor_allow() {
    let core = common::setup();
    core.store.add_grant(1, "read", true);
    core.store.add_grant(2, "read", false);
    core.authz.reload_permissions().await.unwrap();

    // The root keeps its own grant; the denying descendant and anything
    // below it lose the inherited permission.
    assert!(core.authz.has_permission("registered", "read"));
    assert!(!core.authz.has_permission("administrator", "read"));
    assert!(!core.authz.has_permission("moderator", "read"));
}

#[tokio::test]
async fn test_descendant_allow_restores_denied_permission() {
    let core = common::setup();
    core.store.add_grant(1, "read", true);
    core.store.add_grant(2, "read", false);
    core.store.add_grant(3, "read", true);
    core.authz.reload_permissions().await.unwrap();

    assert!(!core.authz.has_permission("administrator", "read"));
    assert!(core.authz.has_permission("moderator", "read"));
}

#[tokio::test]
async fn test_permissions_are_inherited_down_the_chain() {
    let core = common::setup();
    core.store.add_grant(2, "write", true);
    core.authz.reload_permissions().await.unwrap();

    assert!(core.authz.has_permission("administrator", "write"));
    assert!(core.authz.has_permission("moderator", "write"));
    assert!(!core.authz.has_permission("registered", "write"));
}

#[tokio::test]
async fn test_ties_within_a_group_resolve_by_grant_id() {
    let core = common::setup();
    // Allow then deny on the same group: the higher grant id wins.
    core.store.add_grant(1, "publish", true);
    core.store.add_grant(1, "publish", false);
    // Deny then allow on another permission.
    core.store.add_grant(1, "archive", false);
    core.store.add_grant(1, "archive", true);
    core.authz.reload_permissions().await.unwrap();

    assert!(!core.authz.has_permission("registered", "publish"));
    assert!(core.authz.has_permission("registered", "archive"));
}

#[tokio::test]
async fn test_wildcard_permission_is_always_granted() {
    let core = common::setup();
    core.authz.reload_permissions().await.unwrap();

    // Even groups with no grants at all carry the wildcard.
    assert!(core.authz.has_permission("registered", "*"));
    assert!(core.authz.has_permission("moderator", "*"));
    // And even groups the cache has never heard of.
    assert!(core.authz.has_permission("no-such-group", "*"));
}

#[tokio::test]
async fn test_unknown_group_holds_nothing() {
    let core = common::setup();
    core.store.add_grant(1, "read", true);
    core.authz.reload_permissions().await.unwrap();

    assert!(!core.authz.has_permission("no-such-group", "read"));
}

#[tokio::test]
async fn test_lookup_by_numeric_id_matches_lookup_by_name() {
    let core = common::setup();
    core.store.add_grant(1, "read", true);
    core.store.add_grant(2, "write", true);
    core.authz.reload_permissions().await.unwrap();

    assert!(core.authz.has_permission("1", "read"));
    assert!(core.authz.has_permission("2", "write"));
    assert_eq!(
        core.authz.has_permission("2", "read"),
        core.authz.has_permission("administrator", "read"),
    );
}

#[tokio::test]
async fn test_is_group_based_on() {
    let core = common::setup();
    core.authz.reload_permissions().await.unwrap();

    assert!(core.authz.is_group_based_on("moderator", "moderator"));
    assert!(core.authz.is_group_based_on("moderator", "administrator"));
    assert!(core.authz.is_group_based_on("moderator", "registered"));

    // The relation is directional.
    assert!(!core.authz.is_group_based_on("registered", "moderator"));
    assert!(!core.authz.is_group_based_on("administrator", "moderator"));

    // Wildcard base means "no group restriction".
    assert!(core.authz.is_group_based_on("registered", "*"));
    assert!(core.authz.is_group_based_on("no-such-group", "*"));

    assert!(!core.authz.is_group_based_on("no-such-group", "registered"));
}

#[tokio::test]
async fn test_failed_rebuild_keeps_previous_snapshot() {
    let core = common::setup();
    core.store.add_grant(1, "read", true);
    core.store.add_grant(2, "write", true);
    core.authz.reload_permissions().await.unwrap();

    assert!(core.authz.has_permission("administrator", "write"));
    assert!(core.authz.is_group_based_on("moderator", "administrator"));

    // Administrative delete races the rebuild: the moderator closure now
    // dangles, so the rebuild must abort wholesale.
    core.store.remove_group(2);
    let err = core.authz.reload_permissions().await.unwrap_err();
    assert!(matches!(err, ServiceError::GroupNotFound(2)));

    // Every lookup still answers from the old, fully consistent snapshot.
    assert!(core.authz.has_permission("administrator", "write"));
    assert!(core.authz.has_permission("moderator", "write"));
    assert!(core.authz.has_permission("registered", "read"));
    assert!(core.authz.is_group_based_on("moderator", "administrator"));
}

#[tokio::test]
async fn test_cold_cache_answers_conservatively() {
    // No reload yet: nothing is granted except the wildcard.
    let core = common::setup();
    core.store.add_grant(1, "read", true);

    assert!(!core.authz.has_permission("registered", "read"));
    assert!(core.authz.has_permission("registered", "*"));
    assert!(!core.authz.is_group_based_on("moderator", "registered"));
}

#[tokio::test]
async fn test_reload_picks_up_grant_changes() {
    let core = common::setup();
    core.store.add_grant(1, "read", true);
    core.authz.reload_permissions().await.unwrap();
    assert!(core.authz.has_permission("registered", "read"));

    // Grants are read-only to this core; a change shows up only after
    // the next explicit reload.
    core.store.add_grant(1, "read", false);
    assert!(core.authz.has_permission("registered", "read"));

    core.authz.reload_permissions().await.unwrap();
    assert!(!core.authz.has_permission("registered", "read"));
}

#[tokio::test]
async fn test_concurrent_reads_during_reload() {
    let core = common::setup();
    core.store.add_grant(1, "read", true);
    core.authz.reload_permissions().await.unwrap();

    let authz = core.authz.clone();
    let reader = tokio::spawn(async move {
        for _ in 0..1000 {
            // The data never changes across these reloads, so every
            // snapshot the reader lands on must answer identically.
            assert!(authz.has_permission("registered", "read"));
            assert!(authz.is_group_based_on("moderator", "registered"));
        }
    });

    for _ in 0..10 {
        core.authz.reload_permissions().await.unwrap();
    }
    reader.await.unwrap();
}
