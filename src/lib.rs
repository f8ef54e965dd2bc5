//! # grr
//!
//! **grr** runs units of async work ("threads") with a typed lifecycle and a
//! status feed. Each thread follows one of three execution patterns:
//!
//! - **Simple**: run the work once;
//! - **Iterator**: run it N times back to back (N <= 0: until stopped);
//! - **Ticker**: run it N times with a fixed delay between passes (N <= 0: until stopped).
//!
//! ## Architecture
//! ```text
//!   caller                               Thread
//!  ┌────────────────────────┐          ┌──────────────────────────────────────┐
//!  │ Thread::iterator(f, n) │─────────►│ id (Uuid) · Pattern · Work · Context │
//!  │                        │          │                                      │
//!  │ tokio::spawn(start) ───┼─────────►│ start(): Started → Iterate* → finish │
//!  │                        │          │                                 │    │
//!  │ stop() ────────────────┼─────────►│ stop():  cancel ctx ──────────► finish
//!  │                        │          │                                 │    │
//!  │ take_status() ◄────────┼──────────┤ bounded mpsc: Pending … Finished ◄┘  │
//!  └────────────────────────┘          └──────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Pending ──► Started ──► Iterate (× pass) ──► Finished ──► channel closed
//!
//! per pass {
//!   ├─► remaining -= 1, publish Iterate{ pass, remaining }
//!   ├─► context cancelled? ─► exit (the work is not invoked)
//!   ├─► work.call()         (never interrupted)
//!   └─► ticker: sleep(tick) unless this was the last pass
//! }
//! ```
//!
//! ## Rules
//! - Cancellation is **cooperative**: `stop` only prevents the next pass.
//! - `Finished` is emitted and the channel closed **exactly once**, whether the
//!   pattern completes, `stop` is called, or both race.
//! - The status channel is **bounded** (`3` or `n + 3` slots); a consumer that stops
//!   draining stalls `start`.
//! - The crate never spawns: the caller drives `start` on its own task.
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                     |
//! |-------------------|----------------------------------------------------------|----------------------------------------|
//! | **Threads**       | Construct, start, stop; identity and pattern.            | [`Thread`], [`Pattern`], [`ThreadBuilder`] |
//! | **Status feed**   | Ordered, timestamped lifecycle events.                   | [`Status`], [`StatusEvent`], [`StatusKind`] |
//! | **Context**       | Iteration budget, tick delay, cancellation signal.       | [`Context`], [`Budget`]                |
//! | **Work**          | The opaque unit invoked once per pass.                   | [`Work`], [`WorkFn`], [`WorkRef`]      |
//! | **Errors**        | Misuse and captured panics.                              | [`ThreadError`]                        |
//! | **Configuration** | Name and failure policy.                                 | [`ThreadConfig`], [`FailurePolicy`]    |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use grr::{StatusKind, Thread};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let thread = Thread::ticker(|| async { println!("tick") }, Duration::from_millis(10), 0);
//!     let mut status = thread.take_status().unwrap();
//!
//!     let runner = thread.clone();
//!     let handle = tokio::spawn(async move { runner.start().await });
//!
//!     while let Some(ev) = status.recv().await {
//!         if ev.kind == StatusKind::Iterate && ev.pass == Some(3) {
//!             thread.stop();
//!         }
//!     }
//!     handle.await.unwrap().unwrap();
//! }
//! ```
mod config;
mod context;
mod error;
mod status;
mod thread;
mod work;

// ---- Public re-exports ----

pub use config::{FailurePolicy, ThreadConfig};
pub use context::{Budget, Context};
pub use error::ThreadError;
pub use status::{Status, StatusEvent, StatusKind, TryRecvError};
pub use thread::{Pattern, Thread, ThreadBuilder};
pub use work::{Work, WorkFn, WorkRef};

// Optional: expose a simple built-in status printer (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "logging")]
pub use log::LogWriter;
