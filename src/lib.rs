//! Darbi front-door gateway library.
//!
//! Decides which front-end application (customer, merchant, admin) a
//! request belongs to, on the server from the host and on the client from
//! the host and path.

pub mod bootstrap;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{
    is_subdomain_mode, resolve_client_app_type, resolve_server_app_type, ClientApp, ServerApp,
};
