//! Named account permission flags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::bitmask::AccountPermissions;
use super::error::PermissionError;

/// A single named account permission.
///
/// Declaration order is the bit order: the discriminant of each variant is
/// the bit index it occupies in the stored bitmask.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PermissionFlag {
    /// Answer and route inbound phone calls
    ManageInboundPhoneCalls = 0,
    /// Read and export call data records
    ManageCallDataRecords = 1,
}

impl PermissionFlag {
    /// Returns the stable wire name of the flag.
    ///
    /// # Examples
    ///
    /// ```
    /// use callbox_accounts::permissions::PermissionFlag;
    ///
    /// let flag = PermissionFlag::ManageCallDataRecords;
    /// assert_eq!(flag.as_str(), "manage_call_data_records");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ManageInboundPhoneCalls => "manage_inbound_phone_calls",
            Self::ManageCallDataRecords => "manage_call_data_records",
        }
    }

    /// Bit index of this flag in the stored bitmask.
    #[must_use]
    pub const fn index(self) -> u32 {
        self as u32
    }

    /// The single-flag permission set for this flag.
    #[must_use]
    pub const fn bit(self) -> AccountPermissions {
        AccountPermissions::from_bits_retain(1 << self.index())
    }

    /// Returns all flags in bit order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::ManageInboundPhoneCalls, Self::ManageCallDataRecords]
    }

    /// Returns a human-readable description of the flag.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::ManageInboundPhoneCalls => "Manage inbound phone calls",
            Self::ManageCallDataRecords => "Manage call data records",
        }
    }
}

impl fmt::Display for PermissionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionFlag {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|flag| flag.as_str() == s)
            .ok_or_else(|| PermissionError::UnknownFlag(s.to_owned()))
    }
}
