//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request id, trace, timeout)
//!     → handlers.rs (decode JSON / path / query)
//!     → SessionStore (create, get, list) or Dispatcher (send, resend)
//!     → error.rs (map failures to status codes)
//!     → JSON response
//! ```
//!
//! # Routes
//! - `GET  /status`
//! - `GET  /sessions`, `POST /sessions`
//! - `GET  /sessions/{id}`
//! - `POST /sessions/{id}/resend[?url=]`, optional body `{"url": ...}`
//! - `GET  /sessions/{id}/raw[?url=]`

pub mod error;
pub mod handlers;
pub mod request;
pub mod server;

pub use error::ApiError;
pub use request::X_REQUEST_ID;
pub use server::{AppState, SpyglassServer};
