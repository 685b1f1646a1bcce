//! Account models.
//!
//! Access tokens, phone calls and incoming phone numbers are owned by other
//! parts of the platform; accounts only read them.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::permissions::{
    encode, AccountPermissions, PermissionError, PermissionFlag, DEFAULT_BITMASK,
};

/// Account model.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub permissions_bitmask: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Associated access token, loaded by the store.
    #[sqlx(skip)]
    #[serde(skip)]
    pub access_token: Option<AccessToken>,
}

impl Account {
    /// Public identifier of the account. Alias of `id`.
    #[must_use]
    pub const fn sid(&self) -> Uuid {
        self.id
    }

    /// Decode the stored bitmask.
    pub const fn permissions(&self) -> Result<AccountPermissions, PermissionError> {
        AccountPermissions::from_db(self.permissions_bitmask)
    }

    /// Check a single flag. Invalid stored bitmasks grant nothing.
    #[must_use]
    pub fn can(&self, flag: PermissionFlag) -> bool {
        self.permissions().is_ok_and(|perms| perms.has(flag))
    }

    /// Token string of the associated access token, if any.
    #[must_use]
    pub fn auth_token(&self) -> Option<&str> {
        self.access_token.as_ref().map(|token| token.token.as_str())
    }
}

/// Token string of the account's access token, if it has one.
///
/// # Examples
///
/// ```
/// use callbox_accounts::account::{auth_token, Account};
///
/// let account = Account {
///     id: uuid::Uuid::now_v7(),
///     permissions_bitmask: 0,
///     created_at: chrono::Utc::now(),
///     updated_at: chrono::Utc::now(),
///     access_token: None,
/// };
/// assert_eq!(auth_token(&account), None);
/// ```
#[must_use]
pub fn auth_token(account: &Account) -> Option<&str> {
    account.auth_token()
}

/// An account that has not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewAccount {
    #[serde(default)]
    pub permissions_bitmask: i64,
}

impl NewAccount {
    /// New account requesting no permissions.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            permissions_bitmask: DEFAULT_BITMASK,
        }
    }

    /// New account requesting the named flags.
    pub fn with_flags<I, S>(flags: I) -> Result<Self, PermissionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            permissions_bitmask: encode(flags)?,
        })
    }

    /// New account requesting the given permission set.
    #[must_use]
    pub const fn with_permissions(permissions: AccountPermissions) -> Self {
        Self {
            permissions_bitmask: permissions.to_db(),
        }
    }
}

/// OAuth access token whose resource owner is an account.
#[derive(Clone, FromRow, Serialize)]
pub struct AccessToken {
    pub id: Uuid,
    pub resource_owner_id: Uuid,
    #[serde(skip_serializing)]
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    #[must_use]
    pub const fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("id", &self.id)
            .field("resource_owner_id", &self.resource_owner_id)
            .field("token", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("revoked_at", &self.revoked_at)
            .finish()
    }
}

/// Call direction, stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Inbound,
    Outbound,
}

impl TryFrom<String> for CallDirection {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "inbound" => Ok(Self::Inbound),
            "outbound" => Ok(Self::Outbound),
            other => Err(format!("unknown call direction: {other}")),
        }
    }
}

/// Phone call placed or received by an account.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PhoneCall {
    pub id: Uuid,
    pub account_id: Uuid,
    pub to: String,
    pub from: String,
    #[sqlx(try_from = "String")]
    pub direction: CallDirection,
    pub created_at: DateTime<Utc>,
}

/// Phone number routed to an account.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct IncomingPhoneNumber {
    pub id: Uuid,
    pub account_id: Uuid,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}
