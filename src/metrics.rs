// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for the search client.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The embedding application is responsible for choosing the exporter
//! (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `redsearch_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `command`: FT.SEARCH, FT.ADD, FT.SUGADD, ...
//! - `status`: success, error

use metrics::{counter, histogram};
use std::time::Duration;

/// Record one command round-trip by outcome.
pub fn record_command(command: &str, status: &str) {
    counter!(
        "redsearch_commands_total",
        "command" => command.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record search round-trip latency.
pub fn record_search_latency(duration: Duration) {
    histogram!("redsearch_search_seconds").record(duration.as_secs_f64());
}

/// Record the number of ids returned by a search.
pub fn record_search_results(count: usize) {
    histogram!("redsearch_search_results").record(count as f64);
}

/// Record an index bootstrap outcome.
/// `created` is true when the probe missed and FT.CREATE was issued.
pub fn record_bootstrap(created: bool) {
    counter!(
        "redsearch_bootstrap_total",
        "outcome" => if created { "created" } else { "existing" }
    )
    .increment(1);
}
