//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the canonical root cannot send "back" into a subdomain app
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;
use crate::routing::{is_subdomain_mode, ServerApp};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("apps.canonical_root {0:?} is not an absolute http(s) URL")]
    CanonicalRoot(String),

    #[error("apps.canonical_root host {0:?} is itself a subdomain app")]
    CanonicalRootIsSubdomain(String),

    #[error("apps.bundles.{0} must not be empty")]
    EmptyBundle(ServerApp),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a parsed configuration, collecting every error.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if let Err(err) = check_canonical_root(&config.apps.canonical_root) {
        errors.push(err);
    }

    for app in ServerApp::ALL {
        if config.apps.bundles.dir_for(app).as_os_str().is_empty() {
            errors.push(ValidationError::EmptyBundle(app));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_canonical_root(raw: &str) -> Result<Url, ValidationError> {
    let url = Url::parse(raw).map_err(|_| ValidationError::CanonicalRoot(raw.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ValidationError::CanonicalRoot(raw.to_string()));
    }

    let host = url
        .host_str()
        .ok_or_else(|| ValidationError::CanonicalRoot(raw.to_string()))?;

    if is_subdomain_mode(host) {
        return Err(ValidationError::CanonicalRootIsSubdomain(host.to_string()));
    }

    Ok(url)
}
