//! Metrics collection.
//!
//! # Responsibilities
//! - Define the routing core's metrics
//! - Keep metric names in one place; call sites use `record_*` helpers
//!
//! # Metrics
//! - `muxpool_live_resources` (gauge): endpoints currently addressable
//! - `muxpool_retiring_resources` (gauge): removed endpoints still borrowed
//! - `muxpool_pending_calls` (gauge): calls awaiting completion or expiry
//! - `muxpool_resources_destroyed_total` (counter): teardown callbacks fired
//! - `muxpool_create_failures_total` (counter): factory failures
//! - `muxpool_calls_completed_total` (counter, label `rc`): explicit puts
//! - `muxpool_call_timeouts_total` (counter): calls expired un-completed
//! - `muxpool_swept_calls_total` (counter): entries removed by sweeps
//!
//! # Design Decisions
//! - `metrics` facade only; no exporter is bundled with the library
//! - Updates sit on locked paths, so they must stay allocation-light

use metrics::{counter, gauge};

pub fn record_pool_size(live: usize, retiring: usize) {
    gauge!("muxpool_live_resources").set(live as f64);
    gauge!("muxpool_retiring_resources").set(retiring as f64);
}

pub fn record_pending_calls(pending: usize) {
    gauge!("muxpool_pending_calls").set(pending as f64);
}

pub fn record_resource_destroyed() {
    counter!("muxpool_resources_destroyed_total").increment(1);
}

pub fn record_create_failure() {
    counter!("muxpool_create_failures_total").increment(1);
}

pub fn record_call_completed(rc: i32) {
    counter!("muxpool_calls_completed_total", "rc" => rc.to_string()).increment(1);
}

pub fn record_call_timeout() {
    counter!("muxpool_call_timeouts_total").increment(1);
}

pub fn record_sweep(expired: usize) {
    counter!("muxpool_swept_calls_total").increment(expired as u64);
}
