//! # Work abstraction.
//!
//! The thread never inspects its work: it only calls [`Work::call`] once per pass
//! and awaits the returned future. The work gets no cancellation handle; a
//! thread's cancellation takes effect between calls, never during one.

use std::sync::Arc;

use async_trait::async_trait;

/// # Opaque unit of work.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use async_trait::async_trait;
/// use grr::Work;
///
/// struct Counter(Arc<AtomicUsize>);
///
/// #[async_trait]
/// impl Work for Counter {
///     async fn call(&self) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
/// ```
#[async_trait]
pub trait Work: Send + Sync + 'static {
    /// Performs one invocation.
    ///
    /// A panic here is handled according to the thread's
    /// [`FailurePolicy`](crate::FailurePolicy).
    async fn call(&self);
}

/// Shared handle to work.
pub type WorkRef = Arc<dyn Work>;
