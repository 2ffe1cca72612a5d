//! Resolver input.
//!
//! # Design Decisions
//! - Built fresh per request (server) or per page load (client)
//! - Host is taken as-is: no case folding, only the port is stripped
//! - Missing host becomes the empty string, which resolves to the default

use axum::http::{header, Request};

/// Host and path of a request or browser location.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoutingContext {
    host: String,
    path: String,
}

impl RoutingContext {
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
        }
    }

    /// Build a context from an HTTP request.
    ///
    /// The `Host` header wins; HTTP/2 requests without one fall back to the
    /// URI authority.
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let host = req
            .headers()
            .get(header::HOST)
            .and_then(|h| h.to_str().ok())
            .or_else(|| req.uri().authority().map(|a| a.as_str()))
            .map(strip_port)
            .unwrap_or_default();

        Self {
            host: host.to_string(),
            path: req.uri().path().to_string(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Strip a trailing `:port` from a host, keeping IPv6 brackets intact.
fn strip_port(authority: &str) -> &str {
    // userinfo never reaches us through Host, but may through the URI
    let authority = authority.rsplit('@').next().unwrap_or(authority);

    if authority.starts_with('[') {
        return match authority.find(']') {
            Some(end) => &authority[..=end],
            None => authority,
        };
    }

    match authority.rfind(':') {
        Some(idx) => &authority[..idx],
        None => authority,
    }
}
