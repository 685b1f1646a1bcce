//! Account records and their lifecycle hooks.

pub mod hooks;
pub mod models;

pub use hooks::apply_default_on_create;
pub use models::*;
