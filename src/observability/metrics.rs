//! Metrics collection and exposition.
//!
//! # Metrics
//! - `formdrop_submissions_total`: payloads received by the relay server
//! - `formdrop_records_persisted_total`: successful inserts
//! - `formdrop_decode_errors_total`: payloads rejected as malformed
//! - `formdrop_store_errors_total`: inserts that failed (records lost)
//! - `formdrop_relay_errors_total`: HTTP-side relay sends that failed

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
///
/// Failure to install is logged, not fatal: the pipeline runs fine
/// without exposition.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_submission() {
    metrics::counter!("formdrop_submissions_total").increment(1);
}

pub fn record_persisted() {
    metrics::counter!("formdrop_records_persisted_total").increment(1);
}

pub fn record_decode_error() {
    metrics::counter!("formdrop_decode_errors_total").increment(1);
}

pub fn record_store_error() {
    metrics::counter!("formdrop_store_errors_total").increment(1);
}

pub fn record_relay_error() {
    metrics::counter!("formdrop_relay_errors_total").increment(1);
}
