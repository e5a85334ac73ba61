//! Replica-local root history.
//!
//! - `core`: the `RootHistory` state machine
//! - `tests`: unit tests for acceptance and expiry

pub mod core;

pub use self::core::RootHistory;
pub use self::core::RootStatus;
