//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, limits, app type)
//! - Serve the bundle of the resolved application
//! - Apply hot-reloaded configuration
//! - Graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{Query, Request, State},
    http::{header, HeaderValue},
    middleware,
    response::Response,
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    limit::RequestBodyLimitLayer,
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use url::Url;

use crate::bootstrap::{ClientSession, SessionSnapshot};
use crate::config::GatewayConfig;
use crate::http::app_type::app_type_middleware;
use crate::http::bundles::BundleSet;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::observability::metrics;
use crate::routing::{RoutingContext, ServerApp};

/// Error type for server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid canonical root: {0}")]
    CanonicalRoot(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reloadable per-request state.
#[derive(Clone)]
pub struct GatewayState {
    pub canonical_root: Url,
    pub bundles: BundleSet,
}

impl GatewayState {
    pub fn from_config(config: &GatewayConfig) -> Result<Self, ServerError> {
        Ok(Self {
            canonical_root: config.apps.canonical_root_url()?,
            bundles: BundleSet::new(&config.apps.bundles),
        })
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<GatewayState>>,
}

/// Front-door HTTP server.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let state = AppState {
            inner: Arc::new(ArcSwap::from_pointee(GatewayState::from_config(&config)?)),
        };

        let router = Self::build_router(&config, state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        let routes = Router::new()
            .route("/health", get(health))
            .route("/api/app-type", get(app_type))
            .route("/api/bootstrap", get(bootstrap))
            .fallback(serve_bundle)
            .with_state(state);

        gateway_layers(routes, config, Duration::from_secs(config.timeouts.request_secs))
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configurations received on `config_updates` replace the bundles and
    /// canonical root; listener, timeouts and headers keep their startup
    /// values.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GatewayConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let inner = self.state.inner.clone();
        let reload_task = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match GatewayState::from_config(&config) {
                    Ok(next) => {
                        inner.store(Arc::new(next));
                        metrics::record_config_reload();
                        tracing::info!(
                            canonical_root = %config.apps.canonical_root,
                            "Configuration reloaded"
                        );
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Rejected configuration update");
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining connections");
            })
            .await?;

        reload_task.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// A clone of the router, for serving without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Wrap `routes` in the gateway middleware stack.
///
/// `app_type_middleware` sits outside the timeout and body limit so their
/// 408 and 413 responses still carry `X-App-Type`.
#[allow(deprecated)]
fn gateway_layers(routes: Router, config: &GatewayConfig, request_timeout: Duration) -> Router {
    let mut router = routes
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(app_type_middleware));

    if config.security.enable_headers {
        router = router
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            ));
    }

    router
        .layer(TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<Body>| {
            let request_id = request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AppTypeBody {
    pub app_type: ServerApp,
}

/// Report the application resolved by the middleware.
async fn app_type(Extension(app): Extension<ServerApp>) -> Json<AppTypeBody> {
    Json(AppTypeBody { app_type: app })
}

#[derive(Debug, Deserialize)]
struct BootstrapQuery {
    path: Option<String>,
}

/// Client session for this host and the given browser path.
async fn bootstrap(
    State(state): State<AppState>,
    Query(query): Query<BootstrapQuery>,
    request: Request,
) -> Json<SessionSnapshot> {
    let host = RoutingContext::from_request(&request).host().to_string();
    let path = query.path.unwrap_or_else(|| "/".to_string());
    let inner = state.inner.load();

    let session = ClientSession::load(&RoutingContext::new(host, path), &inner.canonical_root);
    Json(session.snapshot())
}

async fn serve_bundle(
    State(state): State<AppState>,
    Extension(app): Extension<ServerApp>,
    request: Request,
) -> Response {
    let bundles = state.inner.load().bundles.clone();
    bundles.serve(app, request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::http::X_APP_TYPE;

    fn server() -> HttpServer {
        HttpServer::new(GatewayConfig::default()).unwrap()
    }

    async fn get(router: Router, host: &str, uri: &str) -> Response {
        let request = axum::http::Request::builder()
            .uri(uri)
            .header("Host", host)
            .body(Body::empty())
            .unwrap();
        router.oneshot(request).await.unwrap()
    }

    async fn json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_carries_app_type_and_request_id() {
        let response = get(server().router(), "merchant.darbi.co", "/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[&X_APP_TYPE], "merchant");
        assert!(response.headers().contains_key(&X_REQUEST_ID));
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    }

    #[tokio::test]
    async fn test_incoming_request_id_is_kept() {
        let request = axum::http::Request::builder()
            .uri("/health")
            .header("Host", "darbi.co")
            .header(X_REQUEST_ID, "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = server().router().oneshot(request).await.unwrap();

        assert_eq!(response.headers()[&X_REQUEST_ID], "abc-123");
    }

    #[tokio::test]
    async fn test_app_type_endpoint() {
        let body = json(get(server().router(), "dashboard.darbi.co", "/api/app-type").await).await;
        assert_eq!(body, serde_json::json!({ "app_type": "admin" }));
    }

    #[tokio::test]
    async fn test_bootstrap_path_mode() {
        let response = get(server().router(), "darbi.co", "/api/bootstrap?path=/merchant/reports").await;
        assert_eq!(response.headers()[&X_APP_TYPE], "customer");

        let body = json(response).await;
        assert_eq!(body["active_app"], "merchant");
        assert_eq!(body["can_switch_apps"], true);
        assert_eq!(body["back"]["kind"], "internal");
        assert_eq!(body["back"]["target"], "/");
    }

    #[tokio::test]
    async fn test_bootstrap_subdomain_mode() {
        let body = json(get(server().router(), "admin.darbi.internal:8443", "/api/bootstrap?path=/anything").await).await;

        assert_eq!(body["active_app"], "admin");
        assert_eq!(body["navigation"]["mode"], "subdomain");
        assert_eq!(body["back"]["kind"], "external");
        assert_eq!(body["back"]["target"], "https://darbi.co/");
    }

    #[tokio::test]
    async fn test_bootstrap_defaults_to_root_path() {
        let body = json(get(server().router(), "darbi.co", "/api/bootstrap").await).await;
        assert_eq!(body["active_app"], "selector");
    }

    #[tokio::test]
    async fn test_security_headers_can_be_disabled() {
        let mut config = GatewayConfig::default();
        config.security.enable_headers = false;
        let server = HttpServer::new(config).unwrap();

        let response = get(server.router(), "darbi.co", "/health").await;
        assert!(!response.headers().contains_key(header::X_FRAME_OPTIONS));
        assert_eq!(response.headers()[&X_APP_TYPE], "customer");
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let mut config = GatewayConfig::default();
        config.security.max_body_size = 16;
        let server = HttpServer::new(config).unwrap();

        let request = axum::http::Request::builder()
            .uri("/api/app-type")
            .header("Host", "business.darbi.co")
            .header(header::CONTENT_LENGTH, "1024")
            .body(Body::from(vec![0u8; 1024]))
            .unwrap();
        let response = server.router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.headers()[&X_APP_TYPE], "merchant");
    }

    #[tokio::test]
    async fn test_body_within_limit_is_served() {
        let mut config = GatewayConfig::default();
        config.security.max_body_size = 16;
        let server = HttpServer::new(config).unwrap();

        let request = axum::http::Request::builder()
            .uri("/api/app-type")
            .header("Host", "darbi.co")
            .header(header::CONTENT_LENGTH, "8")
            .body(Body::from(vec![0u8; 8]))
            .unwrap();
        let response = server.router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_timeout_response_carries_app_type() {
        let routes = Router::new().route(
            "/slow",
            axum::routing::get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                "late"
            }),
        );
        let router = gateway_layers(routes, &GatewayConfig::default(), Duration::from_millis(20));

        let response = get(router, "dashboard.darbi.co", "/slow").await;

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(response.headers()[&X_APP_TYPE], "admin");
        assert!(response.headers().contains_key(&X_REQUEST_ID));
    }

    #[test]
    fn test_invalid_canonical_root_is_rejected() {
        let mut config = GatewayConfig::default();
        config.apps.canonical_root = "not a url".into();
        assert!(matches!(HttpServer::new(config), Err(ServerError::CanonicalRoot(_))));
    }
}
