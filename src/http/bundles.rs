//! Static front-end bundles.
//!
//! Each application has its own directory. Files are served as-is; any
//! path without a matching file gets the bundle's `index.html` so the
//! client router can take over.

use axum::{body::Body, extract::Request, response::Response};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::BundleConfig;
use crate::routing::ServerApp;

type BundleService = ServeDir<ServeFile>;

/// One static file service per application.
#[derive(Clone)]
pub struct BundleSet {
    customer: BundleService,
    merchant: BundleService,
    admin: BundleService,
}

impl BundleSet {
    pub fn new(config: &BundleConfig) -> Self {
        Self {
            customer: bundle_service(config, ServerApp::Customer),
            merchant: bundle_service(config, ServerApp::Merchant),
            admin: bundle_service(config, ServerApp::Admin),
        }
    }

    fn service_for(&self, app: ServerApp) -> BundleService {
        match app {
            ServerApp::Customer => self.customer.clone(),
            ServerApp::Merchant => self.merchant.clone(),
            ServerApp::Admin => self.admin.clone(),
        }
    }

    /// Serve `request` from the bundle of `app`.
    pub async fn serve(&self, app: ServerApp, request: Request) -> Response {
        match self.service_for(app).oneshot(request).await {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        }
    }
}

fn bundle_service(config: &BundleConfig, app: ServerApp) -> BundleService {
    let dir = config.dir_for(app);
    ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use std::fs;

    fn bundle_dirs() -> (tempfile::TempDir, BundleConfig) {
        let root = tempfile::tempdir().unwrap();
        for app in ServerApp::ALL {
            let dir = root.path().join(app.as_str());
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("index.html"), format!("<h1>{app}</h1>")).unwrap();
        }
        fs::write(root.path().join("merchant").join("app.js"), "merchant js").unwrap();

        let config = BundleConfig {
            customer: root.path().join("customer"),
            merchant: root.path().join("merchant"),
            admin: root.path().join("admin"),
        };
        (root, config)
    }

    async fn get(bundles: &BundleSet, app: ServerApp, uri: &str) -> (StatusCode, String) {
        let request = axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = bundles.serve(app, request).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_serves_bundle_of_app() {
        let (_root, config) = bundle_dirs();
        let bundles = BundleSet::new(&config);

        assert_eq!(get(&bundles, ServerApp::Admin, "/").await, (StatusCode::OK, "<h1>admin</h1>".into()));
        assert_eq!(
            get(&bundles, ServerApp::Merchant, "/app.js").await,
            (StatusCode::OK, "merchant js".into())
        );
    }

    #[tokio::test]
    async fn test_unknown_path_falls_back_to_index() {
        let (_root, config) = bundle_dirs();
        let bundles = BundleSet::new(&config);

        let (status, body) = get(&bundles, ServerApp::Customer, "/customer/journeys/42").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>customer</h1>");

        // another app's asset is not reachable
        let (_, body) = get(&bundles, ServerApp::Customer, "/app.js").await;
        assert_eq!(body, "<h1>customer</h1>");
    }

    #[tokio::test]
    async fn test_missing_bundle_is_not_found() {
        let config = BundleConfig {
            customer: "/nonexistent/customer".into(),
            merchant: "/nonexistent/merchant".into(),
            admin: "/nonexistent/admin".into(),
        };
        let bundles = BundleSet::new(&config);

        let (status, _) = get(&bundles, ServerApp::Admin, "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
