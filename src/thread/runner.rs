//! # Execution of a thread's pattern.
//!
//! Drives the work according to the [`Pattern`](super::Pattern) and publishes
//! `Iterate` events. `Started` and `Finished` are emitted by the caller
//! ([`Thread::start`](crate::Thread::start)), which brackets this routine.
//!
//! ## Pass loop
//! ```text
//! loop {
//!   ├─► budget exhausted? ─► exit
//!   ├─► remaining -= 1 (bounded only)
//!   ├─► emit Iterate{ pass, remaining }
//!   ├─► cancelled? ─► exit (work NOT invoked for this pass)
//!   ├─► work.call()
//!   └─► ticker and remaining != 0 ─► sleep(tick)
//! }
//! ```
//!
//! ## Rules
//! - Cancellation is checked once per pass, after `Iterate` and before the work.
//! - A running call and an in-progress tick sleep are never interrupted.
//! - No sleep after the final bounded pass.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time;

use crate::context::Context;
use crate::status::{Emitter, StatusEvent, StatusKind};
use crate::work::Work;

/// Panic message of a captured failure.
pub(crate) type Failure = Arc<str>;

/// Invokes the work once.
///
/// With `capture`, a panic is caught and returned as its message; otherwise it unwinds.
pub(crate) async fn invoke(work: &dyn Work, capture: bool) -> Result<(), Failure> {
    if !capture {
        work.call().await;
        return Ok(());
    }
    AssertUnwindSafe(work.call())
        .catch_unwind()
        .await
        .map_err(|payload| panic_message(payload.as_ref()))
}

/// Runs the pass loop shared by the iterator (`tick = None`) and ticker patterns.
///
/// Returns the number of passes whose work completed.
pub(crate) async fn run_passes(
    ctx: &Context,
    tick: Option<Duration>,
    work: &dyn Work,
    emitter: &Emitter,
    capture: bool,
) -> Result<u64, Failure> {
    let mut remaining = ctx.budget().limit();
    let mut pass: u64 = 0;
    let mut completed: u64 = 0;

    loop {
        if let Some(n) = remaining.as_mut() {
            if *n == 0 {
                break;
            }
            *n -= 1;
        }
        pass += 1;

        let mut ev = StatusEvent::new(StatusKind::Iterate).with_pass(pass);
        if let Some(n) = remaining {
            ev = ev.with_remaining(n);
        }
        if !emitter.emit(ev).await {
            tracing::trace!(pass, "status feed gone; iterate not delivered");
        }

        if ctx.is_cancelled() {
            tracing::trace!(pass, "cancelled at pass boundary");
            break;
        }

        invoke(work, capture).await?;
        completed += 1;

        if let Some(delay) = tick {
            if remaining != Some(0) {
                time::sleep(delay).await;
            }
        }
    }
    Ok(completed)
}

fn panic_message(payload: &(dyn Any + Send)) -> Failure {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        Arc::from(*s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        Arc::from(s.as_str())
    } else {
        Arc::from("non-string panic payload")
    }
}
