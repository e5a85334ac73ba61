//! Home-side propagation dispatcher.
//!
//! - `core`: `PropagationDispatcher` and its per-channel fan-out
//! - `tasks`: the propagation loop and its testable single-step helper
//! - `tests`: unit tests for fan-out and administration

pub mod core;
pub mod tasks;

pub use self::core::ChannelConfig;
pub use self::core::ChannelOutcome;
pub use self::core::DispatchReport;
pub use self::core::PropagationDispatcher;
pub use self::tasks::now_secs;

#[cfg(test)]
mod tests;
