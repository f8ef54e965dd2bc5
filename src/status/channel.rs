//! # Bounded status channel.
//!
//! Each thread owns one single-producer channel built on [`tokio::sync::mpsc`].
//! The producer half ([`Emitter`]) lives inside the thread; the consumer half
//! ([`Status`]) is handed to the caller.
//!
//! ## Architecture
//! ```text
//! Thread::start ──► Emitter::emit ──┐
//!                                   ├──► [bounded queue] ──► Status::recv / Stream
//! Thread::stop  ──► Emitter::finish ┘
//! ```
//!
//! ## Rules
//! - `Pending` is enqueued while the channel is opened, before anyone can receive.
//! - One slot is **reserved** for `Finished` at open time, so `finish` never waits.
//! - `finish` is a one-shot latch: the first call sends `Finished` and drops the
//!   sender; later calls are no-ops. No event is delivered after `Finished`.
//! - `emit` waits for free capacity. A consumer that stops draining stalls the
//!   producer (backpressure).

use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use super::event::StatusEvent;

/// Smallest capacity that fits `Pending` plus the reserved `Finished` slot plus one event.
pub(crate) const MIN_CAPACITY: usize = 3;

/// Producer state guarded by the latch.
struct Link {
    /// `None` once finished.
    tx: Option<mpsc::Sender<StatusEvent>>,
    /// Reserved slot for the final event; taking it is the latch.
    finish: Option<mpsc::OwnedPermit<StatusEvent>>,
}

/// Producer half of a status channel.
pub(crate) struct Emitter {
    link: Mutex<Link>,
}

/// Opens a channel of `capacity` slots (clamped to [`MIN_CAPACITY`]) and enqueues `pending`.
pub(crate) fn open(capacity: usize, pending: StatusEvent) -> (Emitter, Status) {
    let (tx, rx) = mpsc::channel(capacity.max(MIN_CAPACITY));

    // Both reservations fit in a fresh channel of at least MIN_CAPACITY slots.
    if let Ok(permit) = tx.try_reserve() {
        permit.send(pending);
    }
    let finish = tx.clone().try_reserve_owned().ok();

    let link = Link {
        tx: Some(tx),
        finish,
    };
    (
        Emitter {
            link: Mutex::new(link),
        },
        Status { rx },
    )
}

impl Emitter {
    fn lock(&self) -> MutexGuard<'_, Link> {
        self.link.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sends `ev`, waiting for capacity.
    ///
    /// Returns `false` if the channel already finished (or finishes while waiting),
    /// or if the consumer was dropped; the event is discarded in both cases.
    pub(crate) async fn emit(&self, ev: StatusEvent) -> bool {
        let Some(tx) = self.lock().tx.clone() else {
            return false;
        };
        let Ok(permit) = tx.reserve().await else {
            return false;
        };

        let link = self.lock();
        if link.finish.is_none() {
            return false;
        }
        permit.send(ev);
        true
    }

    /// Sends the final event into the reserved slot and closes the channel.
    ///
    /// Returns `true` only for the call that actually finished the channel.
    pub(crate) fn finish(&self, ev: StatusEvent) -> bool {
        let mut link = self.lock();
        let Some(permit) = link.finish.take() else {
            return false;
        };
        drop(permit.send(ev));
        link.tx = None;
        true
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.lock().finish.is_none()
    }
}

/// Receive-only feed of a thread's [`StatusEvent`]s.
///
/// Yields events in production order and ends (`None`) after `Finished` once every
/// in-flight producer has let go of the channel. Also usable as a [`Stream`].
#[derive(Debug)]
pub struct Status {
    rx: mpsc::Receiver<StatusEvent>,
}

impl Status {
    /// Waits for the next event; `None` once the channel is closed and drained.
    pub async fn recv(&mut self) -> Option<StatusEvent> {
        self.rx.recv().await
    }

    /// Returns the next buffered event without waiting.
    ///
    /// - `Err(TryRecvError::Empty)`: nothing buffered yet, the thread is still live
    /// - `Err(TryRecvError::Disconnected)`: the feed is closed and fully drained
    pub fn try_recv(&mut self) -> Result<StatusEvent, TryRecvError> {
        self.rx.try_recv()
    }

    /// Receives until `Finished` (inclusive) or until the channel closes.
    pub async fn until_finished(&mut self) -> Vec<StatusEvent> {
        let mut out = Vec::new();
        while let Some(ev) = self.rx.recv().await {
            let done = ev.is_terminal();
            out.push(ev);
            if done {
                break;
            }
        }
        out
    }
}

impl Stream for Status {
    type Item = StatusEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
