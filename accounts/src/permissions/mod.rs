//! Account permission types and the bitmask codec.
//!
//! An account's permissions are persisted as a single non-negative integer:
//! - Bit `i` is set when the `i`-th entry of [`PermissionFlag::all`] is granted
//! - The flag order is a storage contract; new flags are only ever appended
//! - Bits beyond the defined flags are carried through untouched

pub mod bitmask;
pub mod codec;
pub mod error;
pub mod flag;

pub use bitmask::AccountPermissions;
pub use codec::{decode, encode, is_empty, DEFAULT_BITMASK, FLAG_NAMES};
pub use error::PermissionError;
pub use flag::PermissionFlag;
