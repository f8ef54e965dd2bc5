//! # Function-backed work (`WorkFn`)
//!
//! [`WorkFn`] wraps a closure `F: Fn() -> Fut`, producing a fresh future per call.
//! Shared state between calls goes through `Arc<...>` captured by the closure.
//!
//! ## Example
//! ```rust
//! use grr::{WorkFn, WorkRef};
//!
//! let w: WorkRef = WorkFn::arc(|| async {
//!     // do work...
//! });
//! # let _ = w;
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::work::work_trait::Work;

/// Function-backed work implementation.
#[derive(Debug)]
pub struct WorkFn<F> {
    f: F,
}

impl<F> WorkFn<F> {
    /// Wraps a closure.
    ///
    /// Prefer [`WorkFn::arc`] when you immediately need a [`WorkRef`](crate::WorkRef).
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Wraps the closure and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl<F, Fut> Work for WorkFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = ()> + Send + 'static,
{
    async fn call(&self) {
        (self.f)().await
    }
}
