//! Session records.
//!
//! # Data Flow
//! ```text
//! NewSession (method, url, body?, headers?)
//!     → store.rs (validate, assign id, keep in memory)
//!     → Session (needs_to_send_request() == true)
//!     → dispatcher sends Session::get_raw_request(..)
//!     → store.mark_completed(id, now, raw response)
//!     → Session (needs_to_send_request() == false)
//! ```
//!
//! # Design Decisions
//! - A session's stored URL never changes; retargeting happens per call
//!   through an override URL
//! - Storage is in memory only, shared through `Arc<DashMap>`

pub mod model;
pub mod store;

pub use model::{canonical_path, unix_now, NewSession, Session};
pub use store::{InMemorySessionStore, SessionStore, StoreError};
