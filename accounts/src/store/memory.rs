//! In-memory account store.
//!
//! Not durable: all state is lost when the process exits. Used for tests,
//! local development, and hosts that keep accounts elsewhere and only need
//! the creation contract.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, info};
use uuid::Uuid;

use super::{AccountStore, StoreError, StoreResult};
use crate::account::{
    apply_default_on_create, AccessToken, Account, IncomingPhoneNumber, NewAccount, PhoneCall,
};
use crate::permissions::{decode, AccountPermissions};

/// `DashMap`-backed account store.
///
/// Each account has at most one access token; attaching a new one replaces
/// the previous token.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: DashMap<Uuid, Account>,
    access_tokens: DashMap<Uuid, AccessToken>,
    phone_calls: DashMap<Uuid, Vec<PhoneCall>>,
    incoming_phone_numbers: DashMap<Uuid, Vec<IncomingPhoneNumber>>,
}

impl MemoryAccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a phone call owned by another subsystem.
    pub fn insert_phone_call(&self, call: PhoneCall) {
        self.phone_calls
            .entry(call.account_id)
            .or_default()
            .push(call);
    }

    /// Seed an incoming phone number owned by another subsystem.
    pub fn insert_incoming_phone_number(&self, number: IncomingPhoneNumber) {
        self.incoming_phone_numbers
            .entry(number.account_id)
            .or_default()
            .push(number);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn ensure_exists(&self, id: Uuid) -> StoreResult<()> {
        if self.accounts.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::account_not_found(id))
        }
    }

    /// Clone the stored account and attach its live token.
    fn load(&self, id: Uuid) -> StoreResult<Account> {
        // Clone out before touching the token map
        let mut account = self
            .accounts
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::account_not_found(id))?;

        account.access_token = self
            .access_tokens
            .get(&id)
            .filter(|token| !token.is_revoked())
            .map(|token| token.value().clone());

        Ok(account)
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create_account(&self, mut account: NewAccount) -> StoreResult<Account> {
        // Reject invalid requests before the default can rewrite them
        decode(account.permissions_bitmask)?;
        apply_default_on_create(&mut account);
        let permissions = decode(account.permissions_bitmask)?;

        let now = Utc::now();
        let created = Account {
            id: Uuid::now_v7(),
            permissions_bitmask: permissions.to_db(),
            created_at: now,
            updated_at: now,
            access_token: None,
        };
        self.accounts.insert(created.id, created.clone());

        info!(
            account_id = %created.id,
            permissions = ?permissions.flag_names(),
            "Account created"
        );
        Ok(created)
    }

    async fn find_account(&self, id: Uuid) -> StoreResult<Account> {
        self.load(id)
    }

    async fn update_permissions(
        &self,
        id: Uuid,
        permissions: AccountPermissions,
    ) -> StoreResult<Account> {
        {
            let mut entry = self
                .accounts
                .get_mut(&id)
                .ok_or_else(|| StoreError::account_not_found(id))?;
            entry.permissions_bitmask = permissions.to_db();
            entry.updated_at = Utc::now();
        }

        debug!(account_id = %id, bitmask = permissions.to_db(), "Account permissions updated");
        self.load(id)
    }

    async fn attach_access_token(
        &self,
        account_id: Uuid,
        token: String,
    ) -> StoreResult<AccessToken> {
        self.ensure_exists(account_id)?;

        let access_token = AccessToken {
            id: Uuid::now_v7(),
            resource_owner_id: account_id,
            token,
            created_at: Utc::now(),
            revoked_at: None,
        };
        self.access_tokens.insert(account_id, access_token.clone());

        debug!(account_id = %account_id, token_id = %access_token.id, "Access token attached");
        Ok(access_token)
    }

    async fn phone_calls(&self, account_id: Uuid) -> StoreResult<Vec<PhoneCall>> {
        self.ensure_exists(account_id)?;
        Ok(self
            .phone_calls
            .get(&account_id)
            .map(|calls| calls.value().clone())
            .unwrap_or_default())
    }

    async fn incoming_phone_numbers(
        &self,
        account_id: Uuid,
    ) -> StoreResult<Vec<IncomingPhoneNumber>> {
        self.ensure_exists(account_id)?;
        Ok(self
            .incoming_phone_numbers
            .get(&account_id)
            .map(|numbers| numbers.value().clone())
            .unwrap_or_default())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
