//! Metrics collection and exposition.
//!
//! # Metrics
//! - `spyglass_sessions_created_total` (counter)
//! - `spyglass_requests_sent_total` (counter): by outcome
//! - `spyglass_send_attempts_total` (counter): every transport attempt, retries included
//! - `spyglass_send_duration_seconds` (histogram): build + send + retries

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint. Needs a running Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_session_created() {
    counter!("spyglass_sessions_created_total").increment(1);
}

pub fn record_send_attempt() {
    counter!("spyglass_send_attempts_total").increment(1);
}

/// Record a finished send. `outcome` is `"completed"` or an error kind.
pub fn record_send(outcome: &'static str, start: Instant) {
    counter!("spyglass_requests_sent_total", "outcome" => outcome).increment(1);
    histogram!("spyglass_send_duration_seconds").record(start.elapsed().as_secs_f64());
}
