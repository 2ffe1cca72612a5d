//! Application-type middleware.
//!
//! Resolves the server application from the `Host` header, attaches it to
//! the request for downstream handlers, and exposes it to the client on
//! every response as `X-App-Type`.

use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderName,
    middleware::Next,
    response::Response,
};

use crate::observability::metrics;
use crate::routing::{resolve_server_app_type, RoutingContext};

/// Response header carrying the server's decision.
pub const X_APP_TYPE: HeaderName = HeaderName::from_static("x-app-type");

pub async fn app_type_middleware(mut request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let context = RoutingContext::from_request(&request);
    let app = resolve_server_app_type(context.host());

    tracing::debug!(
        host = %context.host(),
        path = %context.path(),
        app = %app,
        "Resolved application"
    );

    request.extensions_mut().insert(app);

    let mut response = next.run(request).await;
    response.headers_mut().insert(X_APP_TYPE, app.header_value());

    metrics::record_request(app, response.status().as_u16(), start_time);
    response
}
