//! Application routing subsystem.
//!
//! # Data Flow
//! ```text
//! Server: Host header
//!     → context.rs (strip port, no case folding)
//!     → resolver.rs (host rules)
//!     → ServerApp ∈ {customer, merchant, admin}
//!
//! Client: location.hostname + location.pathname
//!     → resolver.rs (host rules, then path rules)
//!     → ClientApp ∈ {customer, merchant, admin, selector}
//! ```
//!
//! # Design Decisions
//! - Pure functions: no state, no I/O, safe from any number of requests
//! - Host prefix always beats path prefix
//! - Total: unmatched input falls to the default, never an error
//! - Server and client defaults differ on purpose (`customer` vs `selector`)

pub mod context;
pub mod identity;
pub mod matcher;
pub mod resolver;

pub use context::RoutingContext;
pub use identity::{ClientApp, ParseAppTypeError, ServerApp};
pub use resolver::{
    is_subdomain_mode, resolve_client_app_type, resolve_server_app_type, ADMIN_HOST_PREFIXES,
    MERCHANT_HOST_PREFIXES,
};
