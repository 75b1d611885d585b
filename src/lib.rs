//! Spyglass: record an HTTP request, build its exact wire bytes, send them,
//! and keep the raw outcome.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod request;
pub mod resilience;
pub mod session;
pub mod transport;

pub use config::SpyglassConfig;
pub use http::SpyglassServer;
pub use lifecycle::Shutdown;
pub use request::{build_raw_request, MalformedUrlError, RawRequest};
pub use session::{NewSession, Session};
