//! Callbox Accounts
//!
//! Account records for the Callbox telephony platform: the permission
//! bitmask codec, the default-permissions hook run before an account is
//! first persisted, and read access to the account's OAuth token.

pub mod account;
pub mod config;
pub mod observability;
pub mod permissions;
pub mod store;

pub use account::{auth_token, Account, NewAccount};
pub use permissions::{AccountPermissions, PermissionError, PermissionFlag};
pub use store::{AccountStore, StoreError, StoreResult};
