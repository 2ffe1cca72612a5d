//! Client session state machine.
//!
//! The navigation mode is chosen once per page load from the host. In
//! subdomain mode the application is fixed for the lifetime of the page;
//! in path mode client-side navigation can move between the three
//! path-prefixed applications and the selector.

use serde::Serialize;
use url::Url;

use crate::routing::{is_subdomain_mode, resolve_client_app_type, ClientApp, RoutingContext};

/// Route of the selector screen in path mode.
pub const SELECTOR_ROUTE: &str = "/";

/// How the top-level router is chosen for this page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "app", rename_all = "snake_case")]
pub enum NavigationMode {
    /// The host fixes one application; no switching.
    Subdomain(ClientApp),
    /// Path prefixes select the application; switching allowed.
    PathPrefixed,
}

/// Where a "back" action leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum BackTarget {
    /// Leave the origin for the canonical root domain.
    External(Url),
    /// Stay on the origin and route internally.
    Internal(&'static str),
}

/// A router to mount under a path prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mount {
    pub prefix: &'static str,
    pub app: ClientApp,
}

const PATH_MOUNTS: [Mount; 4] = [
    Mount { prefix: "/customer", app: ClientApp::Customer },
    Mount { prefix: "/merchant", app: ClientApp::Merchant },
    Mount { prefix: "/admin", app: ClientApp::Admin },
    Mount { prefix: SELECTOR_ROUTE, app: ClientApp::Selector },
];

/// Client-side view of which application is active.
#[derive(Debug, Clone, Serialize)]
pub struct ClientSession {
    host: String,
    mode: NavigationMode,
    active: ClientApp,
    canonical_root: Url,
}

impl ClientSession {
    /// Start a session for a page load at `location`.
    pub fn load(location: &RoutingContext, canonical_root: &Url) -> Self {
        let host = location.host();
        let active = resolve_client_app_type(host, location.path());
        let mode = if is_subdomain_mode(host) {
            NavigationMode::Subdomain(active)
        } else {
            NavigationMode::PathPrefixed
        };

        tracing::debug!(host = %host, app = %active, mode = ?mode, "Client session loaded");

        Self {
            host: host.to_string(),
            mode,
            active,
            canonical_root: canonical_root.clone(),
        }
    }

    /// Apply a client-side navigation and return the active application.
    pub fn navigate(&mut self, path: &str) -> ClientApp {
        if let NavigationMode::PathPrefixed = self.mode {
            self.active = resolve_client_app_type(&self.host, path);
        }
        self.active
    }

    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    pub fn active_app(&self) -> ClientApp {
        self.active
    }

    pub fn can_switch_apps(&self) -> bool {
        matches!(self.mode, NavigationMode::PathPrefixed)
    }

    /// Routers the client mounts for this page load.
    pub fn mounts(&self) -> Vec<Mount> {
        match self.mode {
            NavigationMode::Subdomain(app) => vec![Mount { prefix: "/", app }],
            NavigationMode::PathPrefixed => PATH_MOUNTS.to_vec(),
        }
    }

    pub fn back_target(&self) -> BackTarget {
        match self.mode {
            NavigationMode::Subdomain(_) => BackTarget::External(self.canonical_root.clone()),
            NavigationMode::PathPrefixed => BackTarget::Internal(SELECTOR_ROUTE),
        }
    }

    /// Everything the client needs to mount its routers.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            active_app: self.active,
            navigation: self.mode,
            can_switch_apps: self.can_switch_apps(),
            mounts: self.mounts(),
            back: self.back_target(),
        }
    }
}

/// Serialisable view of a [`ClientSession`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub active_app: ClientApp,
    pub navigation: NavigationMode,
    pub can_switch_apps: bool,
    pub mounts: Vec<Mount>,
    pub back: BackTarget,
}
