use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{FailurePolicy, ThreadConfig};
use crate::context::Context;
use crate::thread::handle::Thread;
use crate::thread::pattern::Pattern;
use crate::work::{WorkFn, WorkRef};

/// Builder for [`Thread`] with fluent API.
///
/// ```rust
/// use std::time::Duration;
/// use grr::{FailurePolicy, Pattern, Thread};
///
/// let thread = Thread::builder()
///     .with_name("poller")
///     .with_failure_policy(FailurePolicy::Capture)
///     .ticker(|| async {}, Duration::from_secs(1), 10);
///
/// assert_eq!(thread.name(), Some("poller"));
/// assert_eq!(thread.pattern(), Pattern::Ticker);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ThreadBuilder {
    config: ThreadConfig,
}

impl ThreadBuilder {
    /// Creates a builder with the default [`ThreadConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    pub fn with_failure_policy(mut self, failure: FailurePolicy) -> Self {
        self.config.failure = failure;
        self
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: ThreadConfig) -> Self {
        self.config = config;
        self
    }

    /// Build a run-once thread from a closure
    pub fn simple<F, Fut>(self, f: F) -> Thread
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.simple_work(WorkFn::arc(f))
    }

    /// Build an iterator thread from a closure (`n <= 0` = unbounded)
    pub fn iterator<F, Fut>(self, f: F, n: i64) -> Thread
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.iterator_work(WorkFn::arc(f), n)
    }

    /// Build a ticker thread from a closure (`n <= 0` = unbounded)
    pub fn ticker<F, Fut>(self, f: F, delay: Duration, n: i64) -> Thread
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.ticker_work(WorkFn::arc(f), delay, n)
    }

    /// Build a run-once thread from existing work
    pub fn simple_work(self, work: WorkRef) -> Thread {
        Thread::build(Pattern::Simple, Context::new(), work, self.config)
    }

    /// Build an iterator thread from existing work
    pub fn iterator_work(self, work: WorkRef, n: i64) -> Thread {
        Thread::build(
            Pattern::Iterator,
            Context::new().with_budget(n),
            work,
            self.config,
        )
    }

    /// Build a ticker thread from existing work
    pub fn ticker_work(self, work: WorkRef, delay: Duration, n: i64) -> Thread {
        Thread::build(
            Pattern::Ticker,
            Context::new().with_tick(delay).with_budget(n),
            work,
            self.config,
        )
    }
}
