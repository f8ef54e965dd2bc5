//! # Per-thread configuration.
//!
//! Provides [`ThreadConfig`] the settings that are not part of the execution
//! pattern itself: a display name for logs and the [`FailurePolicy`] applied
//! when the user work panics.
//!
//! Config is used in two ways:
//! 1. **Plain constructors**: [`Thread::simple`](crate::Thread::simple) and friends use `ThreadConfig::default()`
//! 2. **Builder**: [`Thread::builder`](crate::Thread::builder) overrides individual fields

use std::sync::Arc;

/// What happens when the user work panics inside [`Thread::start`](crate::Thread::start).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The panic is not caught (default).
    ///
    /// It unwinds out of `start` and terminates the enclosing task; `Finished` is
    /// never emitted. The status channel closes once the thread handle is dropped.
    #[default]
    Propagate,
    /// The panic is caught and reported.
    ///
    /// `Finished` is emitted with the panic message as its reason, the channel is
    /// closed, and `start` returns [`ThreadError::Panicked`](crate::ThreadError::Panicked).
    Capture,
}

/// Configuration for a single thread.
///
/// ## Field semantics
/// - `name`: Optional label attached to log records (`None` = identity only)
/// - `failure`: Panic handling policy for the work
#[derive(Clone, Debug, Default)]
pub struct ThreadConfig {
    /// Human-readable label used in logs.
    pub name: Option<Arc<str>>,
    /// Panic handling policy.
    pub failure: FailurePolicy,
}

impl ThreadConfig {
    /// Returns a config with the given name and default policy.
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Returns `true` if panics are captured instead of propagated.
    #[inline]
    pub fn captures_panics(&self) -> bool {
        self.failure == FailurePolicy::Capture
    }
}
