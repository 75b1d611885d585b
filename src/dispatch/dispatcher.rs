//! Send sessions and record their outcome.

use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

use crate::observability::metrics;
use crate::request::{MalformedUrlError, RawRequest};
use crate::resilience::RetryPolicy;
use crate::session::{unix_now, Session, SessionStore, StoreError};
use crate::transport::{RawTransport, Target, TransportError};

/// Errors that can occur while sending a session.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    MalformedUrl(#[from] MalformedUrlError),

    #[error("send failed after {attempts} attempt(s): {source}")]
    Transport {
        attempts: u32,
        #[source]
        source: TransportError,
    },
}

/// Sends sessions from a store through a transport.
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn SessionStore>,
    transport: Arc<dyn RawTransport>,
    policy: RetryPolicy,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn SessionStore>,
        transport: Arc<dyn RawTransport>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            store,
            transport,
            policy,
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Send session `id`, to `override_url` if given, and record the response.
    ///
    /// Works the same for pending and already completed sessions.
    pub async fn send(
        &self,
        id: u64,
        override_url: Option<&str>,
    ) -> Result<Session, DispatchError> {
        let start = Instant::now();
        let session = self.store.get(id).ok_or(StoreError::NotFound(id))?;

        let request = RawRequest::new(
            &session.http_method,
            override_url.unwrap_or(&session.http_url),
            session.http_body.as_deref(),
            session.http_headers.as_deref(),
        )?;
        let target = match Target::from_parts(request.parts()) {
            Ok(target) => target,
            Err(source) => {
                metrics::record_send(source.kind(), start);
                return Err(DispatchError::Transport { attempts: 0, source });
            }
        };
        let raw = request.to_bytes();

        tracing::info!(
            session_id = id,
            session = %session,
            target = %target,
            overridden = override_url.is_some(),
            "Sending session"
        );

        let mut attempts = 0;
        let response = loop {
            attempts += 1;
            metrics::record_send_attempt();

            match self.transport.send(&target, &raw).await {
                Ok(response) => break response,
                Err(e) if self.policy.should_retry(attempts, &e) => {
                    let delay = self.policy.delay(attempts);
                    tracing::warn!(
                        session_id = id,
                        attempt = attempts,
                        delay = ?delay,
                        error = %e,
                        "Retrying send"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(session_id = id, attempts, error = %e, "Send failed");
                    metrics::record_send(e.kind(), start);
                    return Err(DispatchError::Transport { attempts, source: e });
                }
            }
        };

        let completed = self.store.mark_completed(
            id,
            unix_now(),
            String::from_utf8_lossy(&response).into_owned(),
        )?;
        metrics::record_send("completed", start);
        tracing::info!(session_id = id, attempts, bytes = response.len(), "Session completed");
        Ok(completed)
    }

    /// Send every session that still needs sending, in id order.
    pub async fn send_pending(&self) -> Vec<(u64, Result<Session, DispatchError>)> {
        let pending: Vec<u64> = self
            .store
            .list()
            .into_iter()
            .filter(Session::needs_to_send_request)
            .map(|s| s.id)
            .collect();

        let mut results = Vec::with_capacity(pending.len());
        for id in pending {
            results.push((id, self.send(id, None).await));
        }
        results
    }
}
