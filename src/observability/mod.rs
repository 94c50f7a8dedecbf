//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Pool and router paths produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters and gauges via the metrics facade)
//!
//! Consumers:
//!     → whatever subscriber/exporter the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The library only emits; installing a subscriber or a metrics recorder
//!   is the embedding application's choice
//! - Metric updates are cheap enough to sit on pool mutation paths
//! - `logging::init` is provided for binaries and tests that want a sane
//!   default subscriber without wiring one themselves

pub mod logging;
pub mod metrics;
