//! Raw transport.
//!
//! # Data Flow
//! ```text
//! RawRequest
//!     → Target::from_parts (host + port to connect to)
//!     → tcp.rs: connect (connect deadline)
//!         → write every request byte (request deadline)
//!         → read until EOF, idle gap, or deadline
//!     → raw response bytes (unparsed)
//! ```
//!
//! # Design Decisions
//! - One connection per send; nothing is pooled or kept alive
//! - Plain TCP only: `https` targets are refused rather than sent in clear
//! - The response is never parsed, so the end of it is detected by EOF or
//!   by silence after the first bytes arrive

pub mod error;
pub mod tcp;

pub use error::TransportError;
pub use tcp::{RawTransport, Target, TcpTransport};
