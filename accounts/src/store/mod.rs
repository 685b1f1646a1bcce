//! Account persistence.
//!
//! [`AccountStore`] is the seam between account records and the host's
//! storage. Every backend runs
//! [`apply_default_on_create`](crate::account::apply_default_on_create) from
//! `create_account` and nowhere else.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::account::{AccessToken, Account, IncomingPhoneNumber, NewAccount, PhoneCall};
use crate::config::{Config, StoreBackend};
use crate::permissions::{AccountPermissions, PermissionError};

pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;

/// Store error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rejected permission value.
    #[error(transparent)]
    Permission(#[from] PermissionError),

    /// Database error.
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub(crate) fn account_not_found(id: Uuid) -> Self {
        Self::NotFound(format!("account {id}"))
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account, assigning default permissions first.
    async fn create_account(&self, account: NewAccount) -> StoreResult<Account>;

    /// Load an account with its access token.
    async fn find_account(&self, id: Uuid) -> StoreResult<Account>;

    /// Replace the permissions of an existing account.
    async fn update_permissions(
        &self,
        id: Uuid,
        permissions: AccountPermissions,
    ) -> StoreResult<Account>;

    /// Record an externally issued access token for an account.
    async fn attach_access_token(
        &self,
        account_id: Uuid,
        token: String,
    ) -> StoreResult<AccessToken>;

    async fn phone_calls(&self, account_id: Uuid) -> StoreResult<Vec<PhoneCall>>;
    async fn incoming_phone_numbers(
        &self,
        account_id: Uuid,
    ) -> StoreResult<Vec<IncomingPhoneNumber>>;

    async fn health_check(&self) -> StoreResult<()>;
    fn backend_name(&self) -> &'static str;
}

/// Build the store selected by the configuration.
pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn AccountStore>> {
    let store: Arc<dyn AccountStore> = match config.store {
        StoreBackend::Memory => Arc::new(MemoryAccountStore::new()),
        StoreBackend::Postgres => {
            let database = config
                .database
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set for the postgres store"))?;
            Arc::new(PgAccountStore::connect(database).await?)
        }
    };

    info!(backend = store.backend_name(), "Account store ready");
    Ok(store)
}
