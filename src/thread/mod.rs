//! # Threads: lifecycle-tracked units of work.
//!
//! - [`Thread`] - handle with `start` / `stop` and the status feed
//! - [`Pattern`] - execution pattern (simple / iterator / ticker)
//! - [`ThreadBuilder`] - fluent construction with name and failure policy
//!
//! The pass loop lives in `runner`.

mod builder;
mod handle;
mod pattern;
mod runner;

pub use builder::ThreadBuilder;
pub use handle::Thread;
pub use pattern::Pattern;
