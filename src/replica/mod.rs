//! Remote replica host.
//!
//! - `core`: `Replica`, the message entry point wrapping a `RootHistory`
//! - `tasks`: the delivery pump feeding a replica from its transport
//! - `tests`: unit tests for origin checks, budgets and persistence

pub mod core;
pub mod tasks;

pub use self::core::ExecutionCosts;
pub use self::core::Replica;
