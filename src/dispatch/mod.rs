//! Session dispatch.
//!
//! # Responsibilities
//! - Build the raw request for a stored session (optionally retargeted)
//! - Send it through the raw transport, retrying transient failures
//! - Record the completion time and raw response on the session
//!
//! # Design Decisions
//! - A failed send leaves the session pending; only success completes it
//! - Resending a completed session overwrites its recorded outcome

pub mod dispatcher;

pub use dispatcher::{DispatchError, Dispatcher};
