//! Status feed: event data model and the bounded channel carrying it.
//!
//! ## Contents
//! - [`StatusKind`], [`StatusEvent`] event classification and payload metadata
//! - [`Status`] receive-only consumer handle (also a `futures::Stream`)
//! - `Emitter` (crate-private) producer half with the one-shot `Finished` latch

mod channel;
mod event;

pub(crate) use channel::{Emitter, MIN_CAPACITY, open};
pub use channel::Status;
pub use event::{StatusEvent, StatusKind};
pub use tokio::sync::mpsc::error::TryRecvError;
