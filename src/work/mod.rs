//! # User work abstractions.
//!
//! - [`Work`] - trait for the opaque unit of work a thread invokes
//! - [`WorkFn`] - closure-backed implementation
//! - [`WorkRef`] - shared reference to work (`Arc<dyn Work>`)

mod work_fn;
mod work_trait;

pub use work_fn::WorkFn;
pub use work_trait::{Work, WorkRef};
