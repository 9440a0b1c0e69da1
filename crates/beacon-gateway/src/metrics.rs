//! Prometheus metrics recorder and gateway metric names.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Install the Prometheus metrics recorder (global).
///
/// Returns the `PrometheusHandle` used to render the metrics endpoint.
/// Must be called once at startup before any metrics are recorded.
pub fn install_recorder() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install metrics recorder");
    info!("prometheus metrics recorder installed");
    handle
}

/// Render Prometheus text format from the installed recorder.
pub fn render(handle: &PrometheusHandle) -> String {
    handle.render()
}

// Metric name constants to avoid typos across call sites.

/// Connections registered total (counter).
pub const WS_CONNECTIONS_TOTAL: &str = "ws_connections_total";
/// Connections unregistered total (counter).
pub const WS_DISCONNECTIONS_TOTAL: &str = "ws_disconnections_total";
/// Live connections (gauge).
pub const WS_CONNECTIONS_ACTIVE: &str = "ws_connections_active";
/// Delivery failures total (counter).
pub const WS_SEND_ERRORS_TOTAL: &str = "ws_send_errors_total";
/// Legacy-framing upgrades total (counter).
pub const WS_LEGACY_UPGRADES_TOTAL: &str = "ws_legacy_upgrades_total";
