//! # Execution context.
//!
//! [`Context`] carries the per-thread configuration that the execution loop reads
//! (iteration budget and tick delay) together with a cooperative cancellation
//! signal backed by [`CancellationToken`].
//!
//! ## Rules
//! - Configuration is fixed once the thread is built; `with_*` return new values.
//! - Cancellation is terminal: once cancelled, the signal never reverts.
//! - Clones share the same signal; cancelling one cancels all.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Iteration budget as seen by the execution loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Budget {
    /// Run at most this many passes.
    Bounded(u64),
    /// Run until cancelled.
    Unbounded,
}

impl Budget {
    /// Maps a raw budget to a loop bound: `n <= 0` means unbounded.
    pub fn from_raw(n: i64) -> Self {
        if n > 0 {
            Budget::Bounded(n as u64)
        } else {
            Budget::Unbounded
        }
    }

    /// Number of passes, or `None` when unbounded.
    #[inline]
    pub fn limit(&self) -> Option<u64> {
        match self {
            Budget::Bounded(n) => Some(*n),
            Budget::Unbounded => None,
        }
    }
}

/// Configuration and cancellation signal threaded through one thread's run.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use grr::{Budget, Context};
///
/// let ctx = Context::new()
///     .with_budget(3)
///     .with_tick(Duration::from_millis(10));
/// assert_eq!(ctx.budget(), Budget::Bounded(3));
/// assert_eq!(ctx.tick(), Duration::from_millis(10));
///
/// let stopped = ctx.cancelled_copy();
/// assert!(stopped.is_cancelled());
/// assert!(ctx.is_cancelled()); // the signal is shared
/// ```
#[derive(Clone, Debug, Default)]
pub struct Context {
    budget: Option<i64>,
    tick: Option<Duration>,
    token: CancellationToken,
}

impl Context {
    /// Creates a live context with no budget and no tick delay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a context with the given iteration budget (`n <= 0` = unbounded).
    pub fn with_budget(mut self, n: i64) -> Self {
        self.budget = Some(n);
        self
    }

    /// Returns a context with the given delay between passes.
    pub fn with_tick(mut self, delay: Duration) -> Self {
        self.tick = Some(delay);
        self
    }

    /// Raw iteration budget as configured, if any.
    #[inline]
    pub fn raw_budget(&self) -> Option<i64> {
        self.budget
    }

    /// Iteration budget for the execution loop.
    ///
    /// An unset budget is treated as unbounded.
    pub fn budget(&self) -> Budget {
        self.budget.map_or(Budget::Unbounded, Budget::from_raw)
    }

    /// Delay between passes (`Duration::ZERO` when unset).
    pub fn tick(&self) -> Duration {
        self.tick.unwrap_or(Duration::ZERO)
    }

    /// Cancels the signal. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Non-blocking check of the signal.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes once the signal is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Returns a derived context with the same configuration and a cancelled signal.
    ///
    /// The derivative shares the signal with `self`, so cancelling it is observed
    /// by every holder of the original context.
    pub fn cancelled_copy(&self) -> Self {
        let copy = self.clone();
        copy.cancel();
        copy
    }

    /// Returns the underlying token, e.g. to `select!` on it.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}
