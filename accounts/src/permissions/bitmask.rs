//! Account permissions using bitflags.
//!
//! Bit layout:
//! - bit 0: manage inbound phone calls
//! - bit 1: manage call data records
//!
//! Bits above the defined flags are retained, so a value read from storage
//! written by a newer release round-trips without losing grants.

use bitflags::bitflags;

use super::error::PermissionError;
use super::flag::PermissionFlag;

bitflags! {
    /// Account permissions represented as a 64-bit bitfield.
    ///
    /// Stored as BIGINT in PostgreSQL.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    #[serde(transparent)]
    pub struct AccountPermissions: u64 {
        /// Permission to answer and route inbound phone calls
        const MANAGE_INBOUND_PHONE_CALLS = 1 << 0;
        /// Permission to read and export call data records
        const MANAGE_CALL_DATA_RECORDS   = 1 << 1;
    }
}

impl AccountPermissions {
    /// Permissions assigned to a new account that requested none.
    pub const DEFAULT: Self = Self::empty();

    // === Database Conversion ===

    /// Create permissions from a database BIGINT value.
    ///
    /// Unknown bits are kept as-is. Negative values are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use callbox_accounts::permissions::AccountPermissions;
    ///
    /// let perms = AccountPermissions::from_db(3).unwrap();
    /// assert_eq!(perms, AccountPermissions::all());
    /// assert!(AccountPermissions::from_db(-1).is_err());
    /// ```
    pub const fn from_db(value: i64) -> Result<Self, PermissionError> {
        if value < 0 {
            return Err(PermissionError::InvalidBitmask(value));
        }
        Ok(Self::from_bits_retain(value as u64))
    }

    /// Convert permissions to a database BIGINT value.
    #[must_use]
    pub const fn to_db(self) -> i64 {
        self.bits() as i64
    }

    // === Flag Access ===

    /// Check whether the given flag is granted.
    #[must_use]
    pub const fn has(self, flag: PermissionFlag) -> bool {
        self.contains(flag.bit())
    }

    /// True if at least one defined flag is granted.
    ///
    /// Differs from [`is_empty`](Self::is_empty) when only unknown bits are set.
    #[must_use]
    pub const fn has_any_flag(self) -> bool {
        self.intersects(Self::all())
    }

    /// The defined flags only, with unknown bits cleared.
    #[must_use]
    pub const fn known(self) -> Self {
        self.intersection(Self::all())
    }

    /// Bits set beyond the defined flags.
    #[must_use]
    pub const fn unknown_bits(self) -> u64 {
        self.bits() & !Self::all().bits()
    }

    /// Granted flags in bit order.
    pub fn flags(self) -> impl Iterator<Item = PermissionFlag> {
        PermissionFlag::all()
            .iter()
            .copied()
            .filter(move |flag| self.has(*flag))
    }

    /// Wire names of the granted flags in bit order.
    #[must_use]
    pub fn flag_names(self) -> Vec<&'static str> {
        self.flags().map(PermissionFlag::as_str).collect()
    }
}

impl Default for AccountPermissions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<PermissionFlag> for AccountPermissions {
    fn from(flag: PermissionFlag) -> Self {
        flag.bit()
    }
}

impl FromIterator<PermissionFlag> for AccountPermissions {
    fn from_iter<I: IntoIterator<Item = PermissionFlag>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |acc, flag| acc.union(flag.bit()))
    }
}

impl TryFrom<i64> for AccountPermissions {
    type Error = PermissionError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_db(value)
    }
}
