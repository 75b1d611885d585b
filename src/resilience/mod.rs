//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Sending a session:
//!     → transport enforces connect / request deadlines
//!     → On failure: retries.rs (is the error retryable? attempts left?)
//!     → backoff.rs (how long to wait before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Only connection-level failures are retried; a malformed URL never is
//! - Jittered backoff spreads resends aimed at the same host

pub mod backoff;
pub mod retries;

pub use backoff::calculate_backoff;
pub use retries::RetryPolicy;
