//! Request construction errors.

use thiserror::Error;

/// The URL could not be split into a host and a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed URL {url:?}: {reason}")]
pub struct MalformedUrlError {
    /// The URL exactly as the caller supplied it.
    pub url: String,
    /// Why decomposition failed.
    pub reason: String,
}

impl MalformedUrlError {
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
