//! Client bootstrap.
//!
//! # Data Flow
//! ```text
//! Page load (hostname, pathname)
//!     → session.rs (pick NavigationMode once)
//!     → mounts + back target
//!
//! Navigation event (pathname)
//!     → session.rs (re-resolve in path mode, no-op in subdomain mode)
//! ```
//!
//! The client never trusts shared state for its decision. The server's
//! choice reaches it only through the `X-App-Type` response header.

pub mod session;

use axum::http::HeaderMap;

use crate::http::X_APP_TYPE;
use crate::routing::ServerApp;

pub use session::{BackTarget, ClientSession, Mount, NavigationMode, SessionSnapshot};

/// Read the server's decision from response headers.
///
/// Missing or unrecognised values yield `None`.
pub fn server_hint(headers: &HeaderMap) -> Option<ServerApp> {
    headers
        .get(X_APP_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}
