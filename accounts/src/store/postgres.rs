//! `PostgreSQL` account store.
//!
//! Runtime queries (no compile-time `DATABASE_URL` required). The tables are
//! owned and migrated by the host application:
//! - `accounts (id, permissions_bitmask, created_at, updated_at)`
//! - `oauth_access_tokens (id, resource_owner_id, token, created_at, revoked_at)`
//! - `phone_calls (id, account_id, "to", "from", direction, created_at)`
//! - `incoming_phone_numbers (id, account_id, phone_number, created_at)`

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use super::{AccountStore, StoreError, StoreResult};
use crate::account::{
    apply_default_on_create, AccessToken, Account, IncomingPhoneNumber, NewAccount, PhoneCall,
};
use crate::config::DatabaseConfig;
use crate::permissions::{decode, AccountPermissions};

/// Log and return a database error with context.
macro_rules! db_error {
    ($query:expr, $($field:tt)*) => {
        |e| {
            error!(query = $query, $($field)*, error = %e, "Database query failed");
            e
        }
    };
}

const ACCOUNT_COLUMNS: &str = "id, permissions_bitmask, created_at, updated_at";

/// Account store backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a connection pool from configuration.
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(&config.url)
            .await?;

        info!("Connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn live_access_token(&self, account_id: Uuid) -> sqlx::Result<Option<AccessToken>> {
        sqlx::query_as::<_, AccessToken>(
            "SELECT id, resource_owner_id, token, created_at, revoked_at
             FROM oauth_access_tokens
             WHERE resource_owner_id = $1 AND revoked_at IS NULL
             ORDER BY created_at DESC
             LIMIT 1",
        )
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error!("live_access_token", account_id = %account_id))
    }

    async fn ensure_exists(&self, id: Uuid) -> StoreResult<()> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error!("account_exists", account_id = %id))?;

        if exists {
            Ok(())
        } else {
            Err(StoreError::account_not_found(id))
        }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create_account(&self, mut account: NewAccount) -> StoreResult<Account> {
        // Reject invalid requests before the default can rewrite them
        decode(account.permissions_bitmask)?;
        apply_default_on_create(&mut account);
        let permissions = decode(account.permissions_bitmask)?;

        let created = sqlx::query_as::<_, Account>(&format!(
            "INSERT INTO accounts (id, permissions_bitmask, created_at, updated_at)
             VALUES ($1, $2, NOW(), NOW())
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(permissions.to_db())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error!("create_account", bitmask = permissions.to_db()))?;

        info!(
            account_id = %created.id,
            permissions = ?permissions.flag_names(),
            "Account created"
        );
        Ok(created)
    }

    async fn find_account(&self, id: Uuid) -> StoreResult<Account> {
        let mut account = sqlx::query_as::<_, Account>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error!("find_account", account_id = %id))?
        .ok_or_else(|| StoreError::account_not_found(id))?;

        account.access_token = self.live_access_token(id).await?;
        Ok(account)
    }

    async fn update_permissions(
        &self,
        id: Uuid,
        permissions: AccountPermissions,
    ) -> StoreResult<Account> {
        let mut account = sqlx::query_as::<_, Account>(&format!(
            "UPDATE accounts SET permissions_bitmask = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(id)
        .bind(permissions.to_db())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error!("update_permissions", account_id = %id))?
        .ok_or_else(|| StoreError::account_not_found(id))?;

        account.access_token = self.live_access_token(id).await?;
        Ok(account)
    }

    async fn attach_access_token(
        &self,
        account_id: Uuid,
        token: String,
    ) -> StoreResult<AccessToken> {
        self.ensure_exists(account_id).await?;

        let access_token = sqlx::query_as::<_, AccessToken>(
            "INSERT INTO oauth_access_tokens (id, resource_owner_id, token, created_at)
             VALUES ($1, $2, $3, NOW())
             RETURNING id, resource_owner_id, token, created_at, revoked_at",
        )
        .bind(Uuid::now_v7())
        .bind(account_id)
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error!("attach_access_token", account_id = %account_id))?;

        Ok(access_token)
    }

    async fn phone_calls(&self, account_id: Uuid) -> StoreResult<Vec<PhoneCall>> {
        self.ensure_exists(account_id).await?;

        let calls = sqlx::query_as::<_, PhoneCall>(
            r#"SELECT id, account_id, "to", "from", direction, created_at
               FROM phone_calls
               WHERE account_id = $1
               ORDER BY created_at"#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error!("phone_calls", account_id = %account_id))?;

        Ok(calls)
    }

    async fn incoming_phone_numbers(
        &self,
        account_id: Uuid,
    ) -> StoreResult<Vec<IncomingPhoneNumber>> {
        self.ensure_exists(account_id).await?;

        let numbers = sqlx::query_as::<_, IncomingPhoneNumber>(
            "SELECT id, account_id, phone_number, created_at
             FROM incoming_phone_numbers
             WHERE account_id = $1
             ORDER BY created_at",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error!("incoming_phone_numbers", account_id = %account_id))?;

        Ok(numbers)
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(db_error!("health_check", backend = "postgres"))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
