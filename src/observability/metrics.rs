//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tamper_specs_applied_total` (counter): specs applied, by phase
//! - `tamper_redirects_followed_total` (counter): specs re-keyed to a
//!   redirect target
//! - `tamper_specs_retired_total` (counter): one-shot specs dropped
//! - `tamper_decode_failures_total` (counter): tagged URLs with bad tokens
//! - `tamper_commands_total` (counter): caller commands, by command, outcome
//! - `tamper_store_direct_entries` (gauge): direct associations held
//! - `tamper_store_patterns` (gauge): pattern associations held
//!
//! Without an installed recorder every call here is a no-op.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_spec_applied(phase: &'static str) {
    ::metrics::counter!("tamper_specs_applied_total", "phase" => phase).increment(1);
}

pub fn record_redirect_followed() {
    ::metrics::counter!("tamper_redirects_followed_total").increment(1);
}

pub fn record_spec_retired() {
    ::metrics::counter!("tamper_specs_retired_total").increment(1);
}

pub fn record_decode_failure() {
    ::metrics::counter!("tamper_decode_failures_total").increment(1);
}

pub fn record_command(command: &'static str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    ::metrics::counter!("tamper_commands_total", "command" => command, "outcome" => outcome).increment(1);
}

pub fn record_store_size(direct: usize, patterns: usize) {
    ::metrics::gauge!("tamper_store_direct_entries").set(direct as f64);
    ::metrics::gauge!("tamper_store_patterns").set(patterns as f64);
}
