//! # Thread handle: construction, start and stop.
//!
//! ## Lifecycle
//! ```text
//! build ──► Pending ──► start() ──► Started ──► [runner] ──► finish ──► Finished ──► closed
//!                                                              ▲
//!                              stop() (any task, any time) ────┘
//! ```
//!
//! ## Rules
//! - `Pending` is enqueued before the handle is returned.
//! - `start` runs at most once; the crate never spawns, the caller does.
//! - Natural completion and `stop` share one terminating routine guarded by a
//!   one-shot latch: `Finished` is emitted and the channel closed exactly once.
//! - `stop` never waits: it cancels the context and uses the reserved slot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::config::ThreadConfig;
use crate::context::{Budget, Context};
use crate::error::ThreadError;
use crate::status::{self, Emitter, MIN_CAPACITY, Status, StatusEvent, StatusKind};
use crate::thread::builder::ThreadBuilder;
use crate::thread::pattern::Pattern;
use crate::thread::runner;
use crate::work::{WorkFn, WorkRef};

/// Finish reason when the pattern ran to the end.
const REASON_COMPLETED: &str = "completed";
/// Finish reason when the context was cancelled.
const REASON_STOPPED: &str = "stopped";

struct Inner {
    id: Uuid,
    pattern: Pattern,
    config: ThreadConfig,
    work: WorkRef,
    capacity: usize,
    ctx: Mutex<Context>,
    emitter: Emitter,
    status: Mutex<Option<Status>>,
    started: AtomicBool,
}

/// A single-use unit of concurrently scheduled work with a status feed.
///
/// Cloning is cheap and yields another handle to the same thread, so one task can
/// run [`start`](Thread::start) while another calls [`stop`](Thread::stop).
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use grr::{StatusKind, Thread};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let counter = Arc::new(AtomicUsize::new(0));
/// let c = counter.clone();
/// let thread = Thread::iterator(
///     move || {
///         let c = c.clone();
///         async move {
///             c.fetch_add(1, Ordering::SeqCst);
///         }
///     },
///     3,
/// );
///
/// let mut status = thread.take_status().unwrap();
/// let runner = thread.clone();
/// tokio::spawn(async move { runner.start().await });
///
/// let events = status.until_finished().await;
/// assert_eq!(events.first().unwrap().kind, StatusKind::Pending);
/// assert_eq!(events.last().unwrap().kind, StatusKind::Finished);
/// assert_eq!(counter.load(Ordering::SeqCst), 3);
/// # }
/// ```
#[derive(Clone)]
pub struct Thread {
    inner: Arc<Inner>,
}

impl Thread {
    /// Creates a thread that invokes `f` exactly once.
    pub fn simple<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::build(Pattern::Simple, Context::new(), WorkFn::arc(f), ThreadConfig::default())
    }

    /// Creates a thread that invokes `f` up to `n` times back to back.
    ///
    /// `n <= 0` runs until [`stop`](Thread::stop) is called.
    pub fn iterator<F, Fut>(f: F, n: i64) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::build(
            Pattern::Iterator,
            Context::new().with_budget(n),
            WorkFn::arc(f),
            ThreadConfig::default(),
        )
    }

    /// Creates a thread that invokes `f` up to `n` times, sleeping `delay` between passes.
    ///
    /// `n <= 0` runs until [`stop`](Thread::stop) is called.
    pub fn ticker<F, Fut>(f: F, delay: Duration, n: i64) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::build(
            Pattern::Ticker,
            Context::new().with_tick(delay).with_budget(n),
            WorkFn::arc(f),
            ThreadConfig::default(),
        )
    }

    /// Creates a builder for naming a thread or changing its failure policy.
    pub fn builder() -> ThreadBuilder {
        ThreadBuilder::new()
    }

    /// Shared construction path: identity, channel sizing, initial `Pending`.
    pub(crate) fn build(
        pattern: Pattern,
        ctx: Context,
        work: WorkRef,
        config: ThreadConfig,
    ) -> Self {
        let id = Uuid::new_v4();
        let capacity = status_capacity(pattern, &ctx);
        let (emitter, status) = status::open(capacity, StatusEvent::new(StatusKind::Pending));

        tracing::debug!(
            thread.id = %id,
            thread.name = ?config.name,
            %pattern,
            capacity,
            "thread pending"
        );

        Self {
            inner: Arc::new(Inner {
                id,
                pattern,
                config,
                work,
                capacity,
                ctx: Mutex::new(ctx),
                emitter,
                status: Mutex::new(Some(status)),
                started: AtomicBool::new(false),
            }),
        }
    }

    /// Globally unique identity.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Execution pattern.
    pub fn pattern(&self) -> Pattern {
        self.inner.pattern
    }

    /// Optional display name.
    pub fn name(&self) -> Option<&str> {
        self.inner.config.name.as_deref()
    }

    /// Configuration the thread was built with.
    pub fn config(&self) -> &ThreadConfig {
        &self.inner.config
    }

    /// Capacity of the status channel.
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Snapshot of the current execution context.
    ///
    /// After `stop` this is the cancelled derivative.
    pub fn context(&self) -> Context {
        lock(&self.inner.ctx).clone()
    }

    /// Takes the status feed. Returns `None` after the first call.
    ///
    /// Until taken, the feed stays buffered inside the thread; an unbounded thread
    /// whose feed is never drained stalls once the buffer is full.
    pub fn take_status(&self) -> Option<Status> {
        lock(&self.inner.status).take()
    }

    /// `true` once `Finished` has been emitted.
    pub fn is_finished(&self) -> bool {
        self.inner.emitter.is_finished()
    }

    /// Runs the execution pattern to completion or cancellation.
    ///
    /// Must be driven by the caller's own task (e.g. `tokio::spawn`). Emits
    /// `Started`, then `Iterate` per pass, and finally `Finished` through the same
    /// routine as [`stop`](Thread::stop).
    ///
    /// ### Errors
    /// - [`ThreadError::AlreadyStarted`] on a second call
    /// - [`ThreadError::Stopped`] if `stop` ran first (the work is not invoked)
    /// - [`ThreadError::Panicked`] if the work panicked under
    ///   [`FailurePolicy::Capture`](crate::FailurePolicy::Capture)
    ///
    /// Under the default [`FailurePolicy::Propagate`](crate::FailurePolicy::Propagate)
    /// a panic in the work unwinds out of this future and `Finished` is never sent.
    pub async fn start(&self) -> Result<(), ThreadError> {
        let inner = &self.inner;
        if inner.started.swap(true, Ordering::AcqRel) {
            return Err(ThreadError::AlreadyStarted { id: inner.id });
        }
        if inner.emitter.is_finished() {
            return Err(ThreadError::Stopped { id: inner.id });
        }

        let ctx = self.context();
        tracing::debug!(
            thread.id = %inner.id,
            thread.name = ?inner.config.name,
            "thread started"
        );
        if !inner.emitter.emit(StatusEvent::new(StatusKind::Started)).await {
            tracing::trace!(thread.id = %inner.id, "status feed gone; started not delivered");
        }

        let capture = inner.config.captures_panics();
        let work = inner.work.as_ref();
        let outcome = match inner.pattern {
            Pattern::Simple => runner::invoke(work, capture).await.map(|()| 1),
            Pattern::Iterator => {
                runner::run_passes(&ctx, None, work, &inner.emitter, capture).await
            }
            Pattern::Ticker => {
                runner::run_passes(&ctx, Some(ctx.tick()), work, &inner.emitter, capture).await
            }
        };

        match outcome {
            Ok(passes) => {
                let reason = if ctx.is_cancelled() {
                    REASON_STOPPED
                } else {
                    REASON_COMPLETED
                };
                tracing::trace!(thread.id = %inner.id, passes, "pattern ended");
                self.finish(reason);
                Ok(())
            }
            Err(reason) => {
                tracing::warn!(
                    thread.id = %inner.id,
                    thread.name = ?inner.config.name,
                    %reason,
                    "work panicked"
                );
                self.finish(format!("panicked: {reason}"));
                Err(ThreadError::Panicked {
                    id: inner.id,
                    reason,
                })
            }
        }
    }

    /// Requests termination.
    ///
    /// Cancels the context so no further pass starts, emits `Finished` and closes
    /// the status channel. A call already in progress is not interrupted. Safe to
    /// call any number of times, from any task, before or after `start`.
    pub fn stop(&self) {
        self.finish(REASON_STOPPED);
    }

    /// Terminating routine shared by `stop` and natural completion.
    fn finish(&self, reason: impl Into<Arc<str>>) {
        {
            let mut ctx = lock(&self.inner.ctx);
            let cancelled = ctx.cancelled_copy();
            *ctx = cancelled;
        }
        let fired = self
            .inner
            .emitter
            .finish(StatusEvent::new(StatusKind::Finished).with_reason(reason));
        if fired {
            tracing::debug!(
                thread.id = %self.inner.id,
                thread.name = ?self.inner.config.name,
                "thread finished"
            );
        }
    }
}

impl std::fmt::Debug for Thread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thread")
            .field("id", &self.inner.id)
            .field("name", &self.inner.config.name)
            .field("pattern", &self.inner.pattern)
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Status channel size: `3` for simple threads and unbounded loops, `n + 3` for bounded loops.
fn status_capacity(pattern: Pattern, ctx: &Context) -> usize {
    if !pattern.is_looping() {
        return MIN_CAPACITY;
    }
    match ctx.budget() {
        Budget::Bounded(n) => usize::try_from(n)
            .unwrap_or(usize::MAX)
            .saturating_add(MIN_CAPACITY)
            .min(Semaphore::MAX_PERMITS),
        Budget::Unbounded => MIN_CAPACITY,
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FailurePolicy;
    use futures::StreamExt;
    use std::sync::atomic::AtomicU64;
    use tokio::time::Instant;

    fn counter() -> (
        Arc<AtomicU64>,
        impl Fn() -> std::future::Ready<()> + Send + Sync + 'static,
    ) {
        let hits = Arc::new(AtomicU64::new(0));
        let h = hits.clone();
        let f = move || {
            h.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        };
        (hits, f)
    }

    async fn boom() {
        panic!("boom")
    }

    fn kinds(evs: &[StatusEvent]) -> Vec<StatusKind> {
        evs.iter().map(|e| e.kind).collect()
    }

    fn spawn_start(thread: &Thread) -> tokio::task::JoinHandle<Result<(), ThreadError>> {
        let t = thread.clone();
        tokio::spawn(async move { t.start().await })
    }

    #[tokio::test]
    async fn pending_is_first_for_every_pattern() {
        let threads = [
            Thread::simple(|| async {}),
            Thread::iterator(|| async {}, 2),
            Thread::ticker(|| async {}, Duration::from_millis(1), 2),
        ];
        for thread in threads {
            let mut status = thread.take_status().unwrap();
            let first = status.try_recv().unwrap();
            assert_eq!(first.kind, StatusKind::Pending);
            assert!(!thread.is_finished());
        }
    }

    #[tokio::test]
    async fn simple_runs_once() {
        let (hits, f) = counter();
        let thread = Thread::simple(f);
        assert_eq!(thread.pattern(), Pattern::Simple);
        assert_eq!(thread.capacity(), 3);

        let status = thread.take_status().unwrap();
        spawn_start(&thread).await.unwrap().unwrap();

        let evs: Vec<_> = status.collect().await;
        assert_eq!(
            kinds(&evs),
            vec![StatusKind::Pending, StatusKind::Started, StatusKind::Finished]
        );
        assert_eq!(evs[2].reason.as_deref(), Some("completed"));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(thread.is_finished());
        assert!(thread.context().is_cancelled());
    }

    #[tokio::test]
    async fn iterator_counts_down_to_zero() {
        let (hits, f) = counter();
        let thread = Thread::iterator(f, 3);
        assert_eq!(thread.capacity(), 6);
        let status = thread.take_status().unwrap();
        spawn_start(&thread).await.unwrap().unwrap();

        let evs: Vec<_> = status.collect().await;
        assert_eq!(
            kinds(&evs),
            vec![
                StatusKind::Pending,
                StatusKind::Started,
                StatusKind::Iterate,
                StatusKind::Iterate,
                StatusKind::Iterate,
                StatusKind::Finished,
            ]
        );
        let remaining: Vec<_> = evs.iter().filter_map(|e| e.remaining).collect();
        assert_eq!(remaining, vec![2, 1, 0]);
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn events_are_ordered_by_sequence() {
        let thread = Thread::iterator(|| async {}, 4);
        let status = thread.take_status().unwrap();
        spawn_start(&thread).await.unwrap().unwrap();

        let evs: Vec<_> = status.collect().await;
        assert!(evs.windows(2).all(|w| w[0].seq < w[1].seq));
        assert!(evs.windows(2).all(|w| w[0].at <= w[1].at));
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_sleeps_between_passes_only() {
        let (hits, f) = counter();
        let thread = Thread::ticker(f, Duration::from_millis(50), 4);
        let mut status = thread.take_status().unwrap();
        let handle = spawn_start(&thread);

        let mut started = None;
        let mut finished = None;
        while let Some(ev) = status.recv().await {
            match ev.kind {
                StatusKind::Started => started = Some(Instant::now()),
                StatusKind::Finished => finished = Some(Instant::now()),
                _ => {}
            }
        }
        handle.await.unwrap().unwrap();

        let elapsed = finished.unwrap() - started.unwrap();
        assert!(elapsed >= Duration::from_millis(150), "elapsed {elapsed:?}");
        assert!(elapsed < Duration::from_millis(200), "elapsed {elapsed:?}");
        assert_eq!(hits.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_after_first_iterate_halts_ticker() {
        let (hits, f) = counter();
        let thread = Thread::ticker(f, Duration::from_millis(100), 5);
        let mut status = thread.take_status().unwrap();
        let begin = Instant::now();
        let handle = spawn_start(&thread);

        let mut iterates = 0;
        let mut finished = 0;
        while let Some(ev) = status.recv().await {
            match ev.kind {
                StatusKind::Iterate => {
                    iterates += 1;
                    thread.stop();
                }
                StatusKind::Finished => finished += 1,
                _ => {}
            }
        }
        handle.await.unwrap().unwrap();

        assert!(iterates >= 1 && iterates <= 2, "iterates {iterates}");
        assert_eq!(finished, 1);
        assert!(hits.load(Ordering::SeqCst) <= 1);
        assert!(begin.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn stop_twice_finishes_once() {
        let thread = Thread::iterator(|| async {}, 2);
        let status = thread.take_status().unwrap();
        thread.stop();
        thread.stop();

        let evs: Vec<_> = status.collect().await;
        assert_eq!(kinds(&evs), vec![StatusKind::Pending, StatusKind::Finished]);
        assert_eq!(evs[1].reason.as_deref(), Some("stopped"));
    }

    #[tokio::test]
    async fn start_after_stop_is_rejected() {
        let (hits, f) = counter();
        let thread = Thread::simple(f);
        thread.stop();

        let err = thread.start().await.unwrap_err();
        assert!(matches!(err, ThreadError::Stopped { id } if id == thread.id()));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn second_start_is_rejected() {
        let thread = Thread::simple(|| async {});
        let _status = thread.take_status();
        thread.start().await.unwrap();

        let err = thread.start().await.unwrap_err();
        assert_eq!(err.as_label(), "thread_already_started");
    }

    #[tokio::test]
    async fn stop_racing_completion_emits_single_finished() {
        for _ in 0..50 {
            let thread = Thread::iterator(|| async {}, 3);
            let status = thread.take_status().unwrap();
            let handle = spawn_start(&thread);
            let stopper = thread.clone();
            let stop = tokio::spawn(async move { stopper.stop() });

            let res = handle.await.unwrap();
            assert!(matches!(res, Ok(()) | Err(ThreadError::Stopped { .. })));
            stop.await.unwrap();

            let evs: Vec<_> = status.collect().await;
            let finished = evs.iter().filter(|e| e.is_terminal()).count();
            assert_eq!(finished, 1);
            assert!(evs.last().unwrap().is_terminal());
        }
    }

    #[tokio::test]
    async fn unbounded_iterator_runs_until_stopped() {
        let (hits, f) = counter();
        let thread = Thread::iterator(f, 0);
        assert_eq!(thread.capacity(), 3);
        let mut status = thread.take_status().unwrap();
        let handle = spawn_start(&thread);

        let mut iterates = 0;
        while let Some(ev) = status.recv().await {
            if ev.is_iterate() {
                assert_eq!(ev.remaining, None);
                iterates += 1;
                if iterates == 10 {
                    thread.stop();
                }
            }
        }
        handle.await.unwrap().unwrap();

        assert!(iterates >= 10);
        assert!(hits.load(Ordering::SeqCst) >= 9);
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_ticker_sleeps_every_pass() {
        let (hits, f) = counter();
        let delay = Duration::from_millis(100);
        let thread = Thread::ticker(f, delay, 0);
        let mut status = thread.take_status().unwrap();
        let handle = spawn_start(&thread);

        let mut started = None;
        let mut iterates = 0u32;
        let mut finished = 0;
        while let Some(ev) = status.recv().await {
            match ev.kind {
                StatusKind::Started => started = Some(Instant::now()),
                StatusKind::Iterate => {
                    assert_eq!(ev.remaining, None);
                    iterates += 1;
                    if iterates == 4 {
                        thread.stop();
                    }
                }
                StatusKind::Finished => finished += 1,
                StatusKind::Pending => {}
            }
        }
        handle.await.unwrap().unwrap();

        let elapsed = started.unwrap().elapsed();
        assert_eq!(iterates, 4);
        assert_eq!(finished, 1);
        assert!(elapsed >= delay * 3, "elapsed {elapsed:?}");
        assert!(hits.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn undrained_status_stalls_start() {
        let (hits, f) = counter();
        let thread = Thread::iterator(f, -1);
        let mut status = thread.take_status().unwrap();
        let handle = spawn_start(&thread);

        // Pending + reserved Finished slot + Started fill the queue.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(!handle.is_finished());

        thread.stop();
        let evs = status.until_finished().await;
        assert_eq!(evs.last().unwrap().kind, StatusKind::Finished);
        while status.recv().await.is_some() {}
        handle.await.unwrap().unwrap();
        assert!(hits.load(Ordering::SeqCst) <= 1);
    }

    #[tokio::test]
    async fn capture_policy_reports_panic() {
        let thread = Thread::builder()
            .with_name("exploding")
            .with_failure_policy(FailurePolicy::Capture)
            .iterator(boom, 3);
        let status = thread.take_status().unwrap();

        let err = spawn_start(&thread).await.unwrap().unwrap_err();
        assert!(matches!(&err, ThreadError::Panicked { reason, .. } if reason.contains("boom")));

        let evs: Vec<_> = status.collect().await;
        let last = evs.last().unwrap();
        assert_eq!(last.kind, StatusKind::Finished);
        assert!(last.reason.as_deref().unwrap().starts_with("panicked: "));
        assert_eq!(evs.iter().filter(|e| e.is_iterate()).count(), 1);
    }

    #[tokio::test]
    async fn propagate_policy_unwinds_and_skips_finished() {
        let thread = Thread::simple(boom);
        let status = thread.take_status().unwrap();

        let join = spawn_start(&thread).await;
        assert!(join.unwrap_err().is_panic());
        assert!(!thread.is_finished());

        drop(thread);
        let evs: Vec<_> = status.collect().await;
        assert_eq!(kinds(&evs), vec![StatusKind::Pending, StatusKind::Started]);
    }

    #[test]
    fn capacity_tracks_budget() {
        let t = Thread::iterator(|| async {}, 10);
        assert_eq!(t.capacity(), 13);
        let t = Thread::ticker(|| async {}, Duration::ZERO, -4);
        assert_eq!(t.capacity(), 3);
        let t = Thread::iterator(|| async {}, i64::MAX);
        assert!(t.capacity() <= Semaphore::MAX_PERMITS);
    }

    #[test]
    fn identities_are_unique() {
        let a = Thread::simple(|| async {});
        let b = Thread::simple(|| async {});
        assert_ne!(a.id(), b.id());
    }
}
