//! Transport error definitions.

use thiserror::Error;

/// Errors that can occur while exchanging raw bytes with a target.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The TCP connection could not be established.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// A deadline elapsed.
    #[error("{stage} timed out after {after_ms} ms")]
    Timeout { stage: &'static str, after_ms: u64 },

    /// The peer closed the connection without sending anything.
    #[error("connection closed before any response bytes arrived")]
    EmptyResponse,

    /// Reading or writing failed mid-exchange.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The response grew past the configured limit.
    #[error("response exceeded {limit} bytes")]
    ResponseTooLarge { limit: usize },

    /// The URL scheme cannot be sent over plain TCP.
    #[error("unsupported scheme {0:?}: only plain http can be sent")]
    UnsupportedScheme(String),
}

impl TransportError {
    /// Whether trying again could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::Connect { .. }
                | TransportError::Timeout { .. }
                | TransportError::EmptyResponse
        )
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Connect { .. } => "connect",
            TransportError::Timeout { .. } => "timeout",
            TransportError::EmptyResponse => "empty_response",
            TransportError::Io(_) => "io",
            TransportError::ResponseTooLarge { .. } => "too_large",
            TransportError::UnsupportedScheme(_) => "unsupported_scheme",
        }
    }
}
