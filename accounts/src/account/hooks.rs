//! Hooks run by the persistence layer around account writes.

use tracing::debug;

use super::models::NewAccount;
use crate::permissions::{is_empty, DEFAULT_BITMASK};

/// Assign the default permissions to an account about to be created.
///
/// Must run exactly once per new account, after any other field defaults and
/// before the insert that assigns its id. Only [`NewAccount`] is accepted, so
/// the hook cannot run on an update of a persisted account.
///
/// When the requested bitmask grants no defined flag it is replaced by
/// [`DEFAULT_BITMASK`]; otherwise it is left untouched. Negative bitmasks are
/// never rewritten, so [`decode`](crate::permissions::decode) still rejects
/// them. Idempotent.
pub fn apply_default_on_create(record: &mut NewAccount) {
    if record.permissions_bitmask >= 0 && is_empty(record.permissions_bitmask) {
        if record.permissions_bitmask != DEFAULT_BITMASK {
            debug!(
                requested = record.permissions_bitmask,
                "Dropping undefined permission bits on new account"
            );
        }
        record.permissions_bitmask = DEFAULT_BITMASK;
    }
}
