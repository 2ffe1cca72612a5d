//! Shared utilities for integration tests.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use darbi_gateway::config::{BundleConfig, GatewayConfig};
use darbi_gateway::http::HttpServer;
use darbi_gateway::lifecycle::Shutdown;

/// Write an `index.html` per application under `root`, tagged with `label`.
pub fn write_bundles(root: &Path, label: &str) -> BundleConfig {
    let mut config = BundleConfig::default();
    for (name, slot) in [
        ("customer", &mut config.customer),
        ("merchant", &mut config.merchant),
        ("admin", &mut config.admin),
    ] {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("index.html"), format!("{label}:{name}")).unwrap();
        *slot = dir;
    }
    config
}

/// A gateway running on an ephemeral port.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_tx: mpsc::UnboundedSender<GatewayConfig>,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a gateway with `config` and wait until it accepts requests.
pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_tx, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(100)).await;

    TestGateway {
        addr,
        shutdown,
        config_tx,
    }
}

/// Feed configurations from `updates` (e.g. a `ConfigWatcher`) into a
/// running gateway.
#[allow(dead_code)]
pub fn forward_updates(
    mut updates: mpsc::UnboundedReceiver<GatewayConfig>,
    config_tx: mpsc::UnboundedSender<GatewayConfig>,
) {
    tokio::spawn(async move {
        while let Some(config) = updates.recv().await {
            if config_tx.send(config).is_err() {
                break;
            }
        }
    });
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
