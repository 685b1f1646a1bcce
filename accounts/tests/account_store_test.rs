//! Integration tests for account creation, permission updates and the
//! access-token pass-through against the in-memory store.

mod helpers;

use callbox_accounts::account::CallDirection;
use callbox_accounts::permissions::{encode, AccountPermissions, PermissionError, PermissionFlag};
use callbox_accounts::store::{AccountStore, StoreError};
use callbox_accounts::{auth_token, NewAccount};
use uuid::Uuid;

use helpers::{incoming_phone_number, memory_store, phone_call};

// ============================================================================
// Creation
// ============================================================================

#[tokio::test]
async fn test_create_without_flags_stores_default() {
    let (_, store) = memory_store();

    let account = store.create_account(NewAccount::new()).await.unwrap();
    assert_eq!(account.permissions_bitmask, 0);

    let found = store.find_account(account.id).await.unwrap();
    assert_eq!(found.permissions_bitmask, 0);
    assert_eq!(found.permissions().unwrap().flags().count(), 0);
}

#[tokio::test]
async fn test_create_with_flags_keeps_request() {
    let (_, store) = memory_store();

    let request = NewAccount::with_flags(["manage_call_data_records"]).unwrap();
    let account = store.create_account(request).await.unwrap();

    assert_eq!(account.permissions_bitmask, 2);
    assert!(account.can(PermissionFlag::ManageCallDataRecords));
    assert!(!account.can(PermissionFlag::ManageInboundPhoneCalls));
}

#[tokio::test]
async fn test_create_with_unknown_flag_never_reaches_store() {
    let (memory, _) = memory_store();

    let err = NewAccount::with_flags(["manage_inbound_phone_calls", "nonexistent_flag"])
        .unwrap_err();
    assert_eq!(err, PermissionError::UnknownFlag("nonexistent_flag".into()));
    assert!(memory.is_empty());
}

#[tokio::test]
async fn test_create_assigns_distinct_ids() {
    let (memory, store) = memory_store();

    let a = store.create_account(NewAccount::new()).await.unwrap();
    let b = store.create_account(NewAccount::new()).await.unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(a.sid(), a.id);
    assert_eq!(memory.len(), 2);
}

#[tokio::test]
async fn test_create_with_only_unknown_bits_stores_default() {
    let (_, store) = memory_store();

    let account = store
        .create_account(NewAccount {
            permissions_bitmask: 1 << 8,
        })
        .await
        .unwrap();
    assert_eq!(account.permissions_bitmask, 0);

    let found = store.find_account(account.id).await.unwrap();
    assert_eq!(found.permissions_bitmask, 0);
}

#[tokio::test]
async fn test_create_rejects_negative_bitmask() {
    let (memory, store) = memory_store();

    // -1 has defined bits set, -4 and i64::MIN do not
    for bitmask in [-1, -4, i64::MIN] {
        let err = store
            .create_account(NewAccount {
                permissions_bitmask: bitmask,
            })
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                StoreError::Permission(PermissionError::InvalidBitmask(b)) if b == bitmask
            ),
            "bitmask {bitmask}: {err:?}"
        );
    }
    assert!(memory.is_empty());
}

// ============================================================================
// Updates
// ============================================================================

#[tokio::test]
async fn test_update_does_not_rerun_creation_default() {
    let (_, store) = memory_store();
    let account = store
        .create_account(NewAccount::with_permissions(AccountPermissions::all()))
        .await
        .unwrap();

    // Only undefined bits: the creation hook would reset this to 0
    let unknown_only = AccountPermissions::from_db(1 << 10).unwrap();
    let updated = store
        .update_permissions(account.id, unknown_only)
        .await
        .unwrap();

    assert_eq!(updated.permissions_bitmask, 1 << 10);
    assert!(updated.updated_at >= account.updated_at);
}

#[tokio::test]
async fn test_update_to_empty_stores_zero() {
    let (_, store) = memory_store();
    let account = store
        .create_account(NewAccount::with_flags(["manage_inbound_phone_calls"]).unwrap())
        .await
        .unwrap();

    let updated = store
        .update_permissions(account.id, AccountPermissions::empty())
        .await
        .unwrap();
    assert_eq!(updated.permissions_bitmask, 0);
}

#[tokio::test]
async fn test_update_preserves_unknown_bits_from_stored_value() {
    let (_, store) = memory_store();
    let stored = encode(["manage_call_data_records"]).unwrap() | (1 << 12);
    let account = store
        .create_account(NewAccount {
            permissions_bitmask: stored,
        })
        .await
        .unwrap();
    assert_eq!(account.permissions_bitmask, stored);

    // Grant one more flag on top of whatever is stored
    let perms = account.permissions().unwrap() | PermissionFlag::ManageInboundPhoneCalls.bit();
    let updated = store.update_permissions(account.id, perms).await.unwrap();

    assert_eq!(updated.permissions_bitmask, 3 | (1 << 12));
}

// ============================================================================
// Lookups
// ============================================================================

#[tokio::test]
async fn test_find_missing_account() {
    let (_, store) = memory_store();

    let err = store.find_account(Uuid::now_v7()).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_auth_token_pass_through() {
    let (_, store) = memory_store();
    let account = store.create_account(NewAccount::new()).await.unwrap();

    let found = store.find_account(account.id).await.unwrap();
    assert_eq!(auth_token(&found), None);

    store
        .attach_access_token(account.id, "abc123".to_string())
        .await
        .unwrap();

    let found = store.find_account(account.id).await.unwrap();
    assert_eq!(auth_token(&found), Some("abc123"));
}

#[tokio::test]
async fn test_attach_token_to_missing_account() {
    let (_, store) = memory_store();

    let err = store
        .attach_access_token(Uuid::now_v7(), "abc123".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_associated_records_are_listed_per_account() {
    let (memory, store) = memory_store();
    let account = store.create_account(NewAccount::new()).await.unwrap();
    let other = store.create_account(NewAccount::new()).await.unwrap();

    memory.insert_phone_call(phone_call(account.id, "+85512345678", CallDirection::Inbound));
    memory.insert_phone_call(phone_call(account.id, "+85587654321", CallDirection::Outbound));
    memory.insert_incoming_phone_number(incoming_phone_number(account.id, "+85510999999"));

    let calls = store.phone_calls(account.id).await.unwrap();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|call| call.account_id == account.id));

    let numbers = store.incoming_phone_numbers(account.id).await.unwrap();
    assert_eq!(numbers.len(), 1);
    assert_eq!(numbers[0].phone_number, "+85510999999");

    assert!(store.phone_calls(other.id).await.unwrap().is_empty());
    assert!(store.incoming_phone_numbers(other.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_memory_backend_health() {
    let (_, store) = memory_store();
    store.health_check().await.unwrap();
    assert_eq!(store.backend_name(), "memory");
}
