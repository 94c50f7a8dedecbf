//! Structured logging.
//!
//! # Responsibilities
//! - Offer a default `tracing` subscriber for binaries and tests
//! - Respect `RUST_LOG` when set, fall back to a caller-supplied directive
//!
//! # Design Decisions
//! - Opt-in: the library never installs a subscriber on its own
//! - `try_init` so a subscriber installed earlier (e.g. by a test harness)
//!   wins silently

use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber filtered by `RUST_LOG`, defaulting to
/// `default_directive` (e.g. `"muxpool=info"`). A no-op if a global
/// subscriber is already set.
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
