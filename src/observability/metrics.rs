//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ingress_config_updates_total` (counter): domain updates by domain, outcome
//! - `ingress_config_revision` (gauge): current revision per domain
//! - `ingress_config_override_errors_total` (counter): rejected gateway overrides

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::store::UpdateOutcome;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

pub fn record_update(domain: &str, outcome: UpdateOutcome) {
    let label = match outcome {
        UpdateOutcome::Applied { revision } => {
            metrics::gauge!("ingress_config_revision", "domain" => domain.to_string()).set(revision as f64);
            "applied"
        }
        UpdateOutcome::Rejected => "rejected",
        UpdateOutcome::Ignored => "ignored",
    };
    metrics::counter!(
        "ingress_config_updates_total",
        "domain" => domain.to_string(),
        "outcome" => label
    )
    .increment(1);
}

pub fn record_override_error() {
    metrics::counter!("ingress_config_override_errors_total").increment(1);
}

