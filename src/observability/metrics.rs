//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lattice_components_registered_total` (counter): by component
//! - `lattice_routes_registered_total` (counter): by method
//!
//! # Design Decisions
//! - Updates go through the `metrics` facade; without a recorder they are free
//! - The Prometheus exporter is opt-in via `metrics_address`

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::Verb;

/// Count one registered component.
pub fn record_component_registered(component: &'static str) {
    metrics::counter!("lattice_components_registered_total", "component" => component).increment(1);
}

/// Count one registered route or middleware binding.
pub fn record_route_registered(verb: Verb) {
    metrics::counter!("lattice_routes_registered_total", "method" => verb.to_string()).increment(1);
}

/// Install the Prometheus recorder with an HTTP scrape listener.
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}
