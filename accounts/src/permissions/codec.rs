//! Conversion between flag names and stored bitmasks.

use super::bitmask::AccountPermissions;
use super::error::PermissionError;
use super::flag::PermissionFlag;

/// Stored bitmask of an account with no permissions.
pub const DEFAULT_BITMASK: i64 = 0;

/// Flag names in bit order. Append only.
pub const FLAG_NAMES: [&str; 2] = [
    PermissionFlag::ManageInboundPhoneCalls.as_str(),
    PermissionFlag::ManageCallDataRecords.as_str(),
];

/// Decode a stored bitmask into a permission set.
///
/// Every defined flag whose bit is set is present in the result. Unknown bits
/// are retained in the value but never reported by
/// [`AccountPermissions::flags`].
pub const fn decode(bitmask: i64) -> Result<AccountPermissions, PermissionError> {
    AccountPermissions::from_db(bitmask)
}

/// Encode a set of flag names into a stored bitmask.
///
/// Fails on the first name outside [`FLAG_NAMES`]; no bitmask is produced in
/// that case.
///
/// # Examples
///
/// ```
/// use callbox_accounts::permissions::encode;
///
/// assert_eq!(encode(["manage_call_data_records"]).unwrap(), 2);
/// assert!(encode(["nonexistent_flag"]).is_err());
/// ```
pub fn encode<I, S>(flags: I) -> Result<i64, PermissionError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut permissions = AccountPermissions::empty();
    for name in flags {
        let flag: PermissionFlag = name.as_ref().parse()?;
        permissions |= flag.bit();
    }
    Ok(permissions.to_db())
}

/// True if no defined flag bit is set.
///
/// Total over every input; unknown bits do not count as granted flags.
#[must_use]
pub const fn is_empty(bitmask: i64) -> bool {
    (bitmask as u64) & AccountPermissions::all().bits() == 0
}
