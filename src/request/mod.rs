//! Raw HTTP/1.1 request construction.
//!
//! # Data Flow
//! ```text
//! (method, url | override url, body?, extra header block?)
//!     → decompose.rs (split into scheme, host, port, path+query)
//!     → builder.rs (request line → default headers → Content-Length
//!                   → extra header block → blank line → body)
//!     → raw request text, byte-exact as it goes on the wire
//! ```
//!
//! # Design Decisions
//! - Pure and synchronous: no I/O, no clock, no shared state
//! - Nothing is normalized: host case, path encoding and query survive verbatim
//! - The `Host` header carries the host name only; the port stays in
//!   [`UrlParts`] for the transport
//! - Undecomposable URLs fail with [`MalformedUrlError`] instead of producing
//!   a partial message

pub mod builder;
pub mod decompose;
pub mod error;

pub use builder::{build_raw_request, RawRequest, HTTP_VERSION};
pub use decompose::UrlParts;
pub use error::MalformedUrlError;
