//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup)
//!     → request.rs (request ID)
//!     → app_type.rs (resolve ServerApp, attach to request, X-App-Type)
//!     → handlers: /health, /api/app-type, /api/bootstrap
//!     → bundles.rs (static bundle of the resolved app)
//!     → Send to client
//! ```

pub mod app_type;
pub mod bundles;
pub mod request;
pub mod server;

pub use app_type::{app_type_middleware, X_APP_TYPE};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, AppTypeBody, GatewayState, HttpServer, ServerError};
