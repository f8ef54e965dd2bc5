//! # Status events emitted by a thread.
//!
//! The [`StatusKind`] enum classifies the four lifecycle transitions; the
//! [`StatusEvent`] struct carries the timestamp, a global sequence number and
//! the optional per-kind payload.
//!
//! ## Ordering guarantees
//! Per thread, events arrive in production order:
//! ```text
//! Pending → Started → Iterate* → Finished → (channel closed)
//! ```
//! `seq` is unique and monotonically increasing across all threads in the process.
//!
//! ## Example
//! ```rust
//! use grr::{StatusEvent, StatusKind};
//!
//! let ev = StatusEvent::new(StatusKind::Iterate)
//!     .with_pass(1)
//!     .with_remaining(2);
//!
//! assert_eq!(ev.kind, StatusKind::Iterate);
//! assert_eq!(ev.remaining, Some(2));
//! assert!(!ev.is_terminal());
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static STATUS_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of status events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    /// Thread was constructed and is waiting for `start`.
    ///
    /// Emitted exactly once, synchronously, before the handle is returned.
    Pending,

    /// `start` began executing.
    Started,

    /// A loop pass is about to run (iterator and ticker patterns only).
    ///
    /// Sets:
    /// - `pass`: 1-based pass number
    /// - `remaining`: passes left after this one (bounded budgets only)
    Iterate,

    /// The thread is terminal; the channel closes right after this event.
    ///
    /// Sets:
    /// - `reason`: `"completed"`, `"stopped"`, or a captured failure message
    Finished,
}

impl StatusKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StatusKind::Pending => "pending",
            StatusKind::Started => "started",
            StatusKind::Iterate => "iterate",
            StatusKind::Finished => "finished",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Timestamped lifecycle notification with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`StatusKind`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: StatusKind,
    /// Passes left after this one (`Iterate` with a bounded budget).
    pub remaining: Option<u64>,
    /// 1-based pass number (`Iterate`).
    pub pass: Option<u64>,
    /// Why the thread finished (`Finished`).
    pub reason: Option<Arc<str>>,
}

impl StatusEvent {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: StatusKind) -> Self {
        Self {
            seq: STATUS_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            remaining: None,
            pass: None,
            reason: None,
        }
    }

    /// Attaches the remaining-passes count.
    #[inline]
    pub fn with_remaining(mut self, remaining: u64) -> Self {
        self.remaining = Some(remaining);
        self
    }

    /// Attaches the pass number.
    #[inline]
    pub fn with_pass(mut self, pass: u64) -> Self {
        self.pass = Some(pass);
        self
    }

    /// Attaches a finish reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, StatusKind::Finished)
    }

    #[inline]
    pub fn is_iterate(&self) -> bool {
        matches!(self.kind, StatusKind::Iterate)
    }
}
