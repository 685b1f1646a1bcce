//! Reusable test helpers for account store integration tests.
//!
//! Provides fixture builders for records owned by other subsystems
//! (phone calls, incoming phone numbers) so store listings can be exercised.
#![allow(dead_code)]

use std::sync::Arc;

use callbox_accounts::account::{CallDirection, IncomingPhoneNumber, PhoneCall};
use callbox_accounts::store::{AccountStore, MemoryAccountStore};
use chrono::Utc;
use uuid::Uuid;

/// Fresh in-memory store, both as its concrete type and behind the trait.
pub fn memory_store() -> (Arc<MemoryAccountStore>, Arc<dyn AccountStore>) {
    let store = Arc::new(MemoryAccountStore::new());
    let dyn_store: Arc<dyn AccountStore> = store.clone();
    (store, dyn_store)
}

pub fn phone_call(account_id: Uuid, to: &str, direction: CallDirection) -> PhoneCall {
    PhoneCall {
        id: Uuid::now_v7(),
        account_id,
        to: to.to_string(),
        from: "+85512000000".to_string(),
        direction,
        created_at: Utc::now(),
    }
}

pub fn incoming_phone_number(account_id: Uuid, phone_number: &str) -> IncomingPhoneNumber {
    IncomingPhoneNumber {
        id: Uuid::now_v7(),
        account_id,
        phone_number: phone_number.to_string(),
        created_at: Utc::now(),
    }
}
