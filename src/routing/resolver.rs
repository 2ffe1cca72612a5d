//! Application resolution.
//!
//! Two independent, total functions: one for the server (host only) and one
//! for the client (host, then path). Both walk the same host rule table, so
//! a host prefix always beats a path prefix.

use crate::routing::context::RoutingContext;
use crate::routing::identity::{ClientApp, ServerApp};
use crate::routing::matcher::{HostPrefixMatcher, Matcher, PathPrefixMatcher};

/// Host prefixes that select the merchant application.
pub const MERCHANT_HOST_PREFIXES: &[&str] = &["partners.", "business.", "merchant."];

/// Host prefixes that select the admin application.
pub const ADMIN_HOST_PREFIXES: &[&str] = &["admin.", "dashboard."];

/// Host rules, first match wins.
static HOST_RULES: [(HostPrefixMatcher, ServerApp); 2] = [
    (HostPrefixMatcher::new(MERCHANT_HOST_PREFIXES), ServerApp::Merchant),
    (HostPrefixMatcher::new(ADMIN_HOST_PREFIXES), ServerApp::Admin),
];

/// Path rules for hosts without a recognised subdomain, first match wins.
static PATH_RULES: [(PathPrefixMatcher, ClientApp); 3] = [
    (PathPrefixMatcher::new("/customer"), ClientApp::Customer),
    (PathPrefixMatcher::new("/merchant"), ClientApp::Merchant),
    (PathPrefixMatcher::new("/admin"), ClientApp::Admin),
];

fn match_host(host: &str) -> Option<ServerApp> {
    HOST_RULES
        .iter()
        .find(|(matcher, _)| matcher.matches_host(host))
        .map(|(_, app)| *app)
}

/// Resolve the application for a server request.
///
/// Only the host is consulted. Anything without a merchant or admin prefix,
/// including an empty host, belongs to the customer application.
pub fn resolve_server_app_type(host: &str) -> ServerApp {
    match_host(host).unwrap_or(ServerApp::Customer)
}

/// Resolve the application for a client page load or navigation.
///
/// Recognised subdomains win; otherwise the path prefix decides, and with
/// no match the chooser screen is shown.
pub fn resolve_client_app_type(host: &str, path: &str) -> ClientApp {
    if let Some(app) = match_host(host) {
        return app.into();
    }

    let ctx = RoutingContext::new(host, path);
    PATH_RULES
        .iter()
        .find(|(matcher, _)| matcher.matches(&ctx))
        .map(|(_, app)| *app)
        .unwrap_or(ClientApp::Selector)
}

/// True when the host alone fixes the application.
pub fn is_subdomain_mode(host: &str) -> bool {
    match_host(host).is_some()
}
