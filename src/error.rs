//! Error types returned by [`Thread::start`](crate::Thread::start).
//!
//! The lifecycle itself cannot fail: constructing a thread, emitting status events
//! and stopping are infallible. [`ThreadError`] only covers misuse of a single-use
//! handle and, under [`FailurePolicy::Capture`](crate::FailurePolicy::Capture),
//! a panic raised by the user work.
//!
//! Like the status kinds, the error exposes `as_label` / `as_message` helpers for
//! logs and metrics.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

/// # Errors produced by starting a thread.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum ThreadError {
    /// `start` was called on a thread that has already been started.
    #[error("thread {id} already started")]
    AlreadyStarted {
        /// Identity of the thread.
        id: Uuid,
    },

    /// `stop` ran before `start`; the work was never invoked.
    #[error("thread {id} stopped before start")]
    Stopped {
        /// Identity of the thread.
        id: Uuid,
    },

    /// The work panicked and the failure policy captured it.
    #[error("thread {id} panicked: {reason}")]
    Panicked {
        /// Identity of the thread.
        id: Uuid,
        /// Panic message, or a placeholder if the payload was not a string.
        reason: Arc<str>,
    },
}

impl ThreadError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use grr::ThreadError;
    ///
    /// let err = ThreadError::Stopped { id: uuid::Uuid::nil() };
    /// assert_eq!(err.as_label(), "thread_stopped");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ThreadError::AlreadyStarted { .. } => "thread_already_started",
            ThreadError::Stopped { .. } => "thread_stopped",
            ThreadError::Panicked { .. } => "thread_panicked",
        }
    }

    /// Returns a human-readable message without the thread identity.
    pub fn as_message(&self) -> String {
        match self {
            ThreadError::AlreadyStarted { .. } => "already started".to_string(),
            ThreadError::Stopped { .. } => "stopped before start".to_string(),
            ThreadError::Panicked { reason, .. } => format!("panicked: {reason}"),
        }
    }

    /// Identity of the thread that produced the error.
    pub fn id(&self) -> Uuid {
        match self {
            ThreadError::AlreadyStarted { id }
            | ThreadError::Stopped { id }
            | ThreadError::Panicked { id, .. } => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        let id = Uuid::new_v4();
        assert_eq!(
            ThreadError::AlreadyStarted { id }.as_label(),
            "thread_already_started"
        );
        assert_eq!(ThreadError::Stopped { id }.as_label(), "thread_stopped");
        assert_eq!(
            ThreadError::Panicked { id, reason: "boom".into() }.as_label(),
            "thread_panicked"
        );
    }

    #[test]
    fn display_includes_identity_and_reason() {
        let id = Uuid::new_v4();
        let err = ThreadError::Panicked { id, reason: "boom".into() };
        let text = err.to_string();
        assert!(text.contains(&id.to_string()));
        assert!(text.ends_with("panicked: boom"));
        assert_eq!(err.as_message(), "panicked: boom");
        assert_eq!(err.id(), id);
    }
}
