//! URL decomposition.
//!
//! # Responsibilities
//! - Validate that a URL is absolute and names a host
//! - Split it into scheme, host, port and path (query included)
//!
//! # Design Decisions
//! - `url::Url` is only used as a validator. Its parsed form lowercases hosts,
//!   drops default ports and re-encodes paths, so host and path are sliced
//!   from the caller's own text instead.
//! - Userinfo and fragments never reach the wire and are dropped.
//! - `Url::parse` quietly strips tabs and newlines and treats `\` as `/`, so
//!   text it would repair is rejected up front. Anything sliced from the raw
//!   text is then exactly what the validator saw.

use url::Url;

use crate::request::error::MalformedUrlError;

/// The pieces of an absolute URL that a raw request needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    /// Scheme as written (e.g. `http`).
    pub scheme: String,
    /// Host as written, without userinfo or port. IPv6 literals keep their brackets.
    pub host: String,
    /// Explicit port, if the URL carried one.
    pub port: Option<u16>,
    /// Path plus query string, never empty (`/` at minimum).
    pub path: String,
}

impl UrlParts {
    /// Decompose an absolute URL.
    pub fn parse(raw: &str) -> Result<Self, MalformedUrlError> {
        if let Some(c) = raw
            .chars()
            .find(|c| c.is_control() || c.is_whitespace() || *c == '\\')
        {
            return Err(MalformedUrlError::new(
                raw,
                format!("character {:?} is not allowed in a URL", c),
            ));
        }

        let validated = Url::parse(raw).map_err(|e| MalformedUrlError::new(raw, e.to_string()))?;
        if validated.cannot_be_a_base() {
            return Err(MalformedUrlError::new(raw, "URL has no authority"));
        }

        let (scheme, rest) = raw
            .split_once("://")
            .ok_or_else(|| MalformedUrlError::new(raw, "missing \"://\" after scheme"))?;

        let authority_end = rest
            .find(|c: char| matches!(c, '/' | '?' | '#'))
            .unwrap_or(rest.len());
        let (authority, remainder) = rest.split_at(authority_end);

        let host_port = authority
            .rsplit_once('@')
            .map(|(_, host_port)| host_port)
            .unwrap_or(authority);
        let (host, port) = split_host_port(raw, host_port)?;
        if host.is_empty() {
            return Err(MalformedUrlError::new(raw, "empty host"));
        }

        let path = remainder.split('#').next().unwrap_or_default();
        let path = if path.is_empty() {
            "/".to_string()
        } else if path.starts_with('?') {
            format!("/{}", path)
        } else {
            path.to_string()
        };

        Ok(Self {
            scheme: scheme.to_string(),
            host: host.to_string(),
            port,
            path,
        })
    }

    /// The explicit port, or the well-known port for `http`/`https`.
    pub fn port_or_default(&self) -> Option<u16> {
        self.port.or_else(|| match self.scheme.to_ascii_lowercase().as_str() {
            "http" => Some(80),
            "https" => Some(443),
            _ => None,
        })
    }
}

fn split_host_port<'a>(
    raw: &str,
    host_port: &'a str,
) -> Result<(&'a str, Option<u16>), MalformedUrlError> {
    let (host, port) = if host_port.starts_with('[') {
        // IPv6 literal: the port separator can only follow the closing bracket.
        let close = host_port
            .find(']')
            .ok_or_else(|| MalformedUrlError::new(raw, "unterminated IPv6 literal"))?;
        let (host, after) = host_port.split_at(close + 1);
        (host, after.strip_prefix(':'))
    } else {
        match host_port.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };

    let port = match port {
        None | Some("") => None,
        Some(port) => Some(
            port.parse::<u16>()
                .map_err(|_| MalformedUrlError::new(raw, format!("invalid port {:?}", port)))?,
        ),
    };

    Ok((host, port))
}
