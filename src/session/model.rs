//! Session entity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::request::{build_raw_request, MalformedUrlError};

/// Seconds since the UNIX epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Reference path for a session record.
pub fn canonical_path(id: u64) -> String {
    format!("/sessions/{}", id)
}

/// Fields supplied when a session is created.
///
/// Only `method` and `url` are required; the rest default to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct NewSession {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub body: Option<String>,
    /// Raw `\r\n`-joined `Name: Value` lines, no trailing terminator.
    #[serde(default)]
    pub headers: Option<String>,
}

impl NewSession {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn headers(mut self, headers: impl Into<String>) -> Self {
        self.headers = Some(headers.into());
        self
    }
}

/// One intended HTTP exchange and its outcome.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Session {
    pub id: u64,
    pub http_method: String,
    pub http_url: String,
    pub http_body: Option<String>,
    pub http_headers: Option<String>,
    /// Creation time, seconds since epoch.
    pub time_created: u64,
    /// Set once a request has actually been sent and answered.
    pub time_completed: Option<u64>,
    /// Raw response bytes (lossy UTF-8) from the last completed send.
    pub http_response: Option<String>,
}

impl Session {
    pub fn new(id: u64, fields: NewSession) -> Self {
        Self {
            id,
            http_method: fields.method,
            http_url: fields.url,
            http_body: fields.body,
            http_headers: fields.headers,
            time_created: unix_now(),
            time_completed: None,
            http_response: None,
        }
    }

    /// `"{METHOD} {URL}"`.
    pub fn to_display_string(&self) -> String {
        self.to_string()
    }

    pub fn canonical_path(&self) -> String {
        canonical_path(self.id)
    }

    pub fn needs_to_send_request(&self) -> bool {
        self.time_completed.is_none()
    }

    /// Raw request for this session, optionally retargeted at `override_url`.
    ///
    /// The stored `http_url` is left untouched.
    pub fn get_raw_request(&self, override_url: Option<&str>) -> Result<String, MalformedUrlError> {
        build_raw_request(
            &self.http_method,
            &self.http_url,
            self.http_body.as_deref(),
            self.http_headers.as_deref(),
            override_url,
        )
    }

    pub fn mark_completed(&mut self, completed_at: u64, response: String) {
        self.time_completed = Some(completed_at);
        self.http_response = Some(response);
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.http_method, self.http_url)
    }
}
