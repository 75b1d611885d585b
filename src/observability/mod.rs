//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! store / dispatcher / http server produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG or config)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Session ids travel as structured fields, never inside messages
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
