//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by resolved app and status
//! - `gateway_request_duration_seconds` (histogram): latency by resolved app
//! - `gateway_config_reloads_total` (counter): applied hot reloads

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::ServerApp;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a completed request.
pub fn record_request(app: ServerApp, status: u16, start_time: Instant) {
    counter!(
        "gateway_requests_total",
        "app" => app.as_str(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!("gateway_request_duration_seconds", "app" => app.as_str())
        .record(start_time.elapsed().as_secs_f64());
}

pub fn record_config_reload() {
    counter!("gateway_config_reloads_total").increment(1);
}
