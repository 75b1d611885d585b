//! Plain TCP transport.

use futures_util::future::{BoxFuture, FutureExt};
use std::fmt;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{self, Instant};

use crate::config::TransportConfig;
use crate::request::UrlParts;
use crate::transport::error::TransportError;

/// Where a raw request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: u16,
}

impl Target {
    /// Resolve the connect address for a decomposed URL.
    pub fn from_parts(parts: &UrlParts) -> Result<Self, TransportError> {
        if !parts.scheme.eq_ignore_ascii_case("http") {
            return Err(TransportError::UnsupportedScheme(parts.scheme.clone()));
        }
        Ok(Self {
            host: parts.host.clone(),
            port: parts.port_or_default().unwrap_or(80),
        })
    }

    /// `host:port`, suitable for `TcpStream::connect`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Sends raw request bytes and returns raw response bytes.
pub trait RawTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        target: &'a Target,
        raw: &'a [u8],
    ) -> BoxFuture<'a, Result<Vec<u8>, TransportError>>;
}

/// One TCP connection per send, bounded by the configured deadlines.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    connect_timeout: Duration,
    request_timeout: Duration,
    read_idle: Duration,
    max_response_bytes: usize,
}

impl TcpTransport {
    pub fn new(config: &TransportConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
            request_timeout: config.request_timeout(),
            read_idle: config.read_idle(),
            max_response_bytes: config.max_response_bytes,
        }
    }

    async fn exchange(&self, target: &Target, raw: &[u8]) -> Result<Vec<u8>, TransportError> {
        let addr = target.address();

        let mut stream = time::timeout(self.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| TransportError::Timeout {
                stage: "connect",
                after_ms: self.connect_timeout.as_millis() as u64,
            })?
            .map_err(|source| TransportError::Connect { addr: addr.clone(), source })?;

        let deadline = Instant::now() + self.request_timeout;
        let request_timed_out = |stage| TransportError::Timeout {
            stage,
            after_ms: self.request_timeout.as_millis() as u64,
        };

        time::timeout_at(deadline, stream.write_all(raw))
            .await
            .map_err(|_| request_timed_out("write"))??;
        tracing::trace!(target_addr = %addr, bytes = raw.len(), "Request written");

        let mut response = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            // Before the first byte only the overall deadline applies; after it,
            // a quiet connection is taken to mean the response is complete.
            let read_deadline = if response.is_empty() {
                deadline
            } else {
                deadline.min(Instant::now() + self.read_idle)
            };

            match time::timeout_at(read_deadline, stream.read(&mut buf)).await {
                Ok(Ok(0)) => break,
                Ok(Ok(n)) => {
                    response.extend_from_slice(&buf[..n]);
                    if response.len() > self.max_response_bytes {
                        return Err(TransportError::ResponseTooLarge {
                            limit: self.max_response_bytes,
                        });
                    }
                }
                Ok(Err(e)) => return Err(TransportError::Io(e)),
                Err(_) if !response.is_empty() => break,
                Err(_) => return Err(request_timed_out("read")),
            }
        }

        if response.is_empty() {
            return Err(TransportError::EmptyResponse);
        }

        tracing::trace!(target_addr = %addr, bytes = response.len(), "Response read");
        Ok(response)
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new(&TransportConfig::default())
    }
}

impl RawTransport for TcpTransport {
    fn send<'a>(
        &'a self,
        target: &'a Target,
        raw: &'a [u8],
    ) -> BoxFuture<'a, Result<Vec<u8>, TransportError>> {
        self.exchange(target, raw).boxed()
    }
}
