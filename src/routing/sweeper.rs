//! Background deadline sweeping.
//!
//! # Responsibilities
//! - Tick [`Router::cleanup`] at a fixed interval
//! - Exit promptly on the shutdown signal
//!
//! The router itself performs no internal scheduling; this task is the
//! owner-driven timer the routing core expects.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;

use crate::handler::RouteHandler;
use crate::lifecycle::{Shutdown, ShutdownSignal};
use crate::routing::Router;

/// Periodic driver for [`Router::cleanup`].
pub struct Sweeper<H: RouteHandler> {
    router: Arc<Router<H>>,
    interval: Duration,
}

impl<H: RouteHandler> Sweeper<H> {
    pub fn new(router: Arc<Router<H>>, interval: Duration) -> Self {
        Self { router, interval }
    }

    /// Run until the shutdown signal is latched. The signal is level-
    /// triggered, so a sweeper spawned after teardown exits on its first
    /// poll instead of ticking forever.
    pub async fn run(self, mut shutdown: ShutdownSignal) {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            "sweeper starting"
        );
        let mut ticker = time::interval(self.interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.router.cleanup();
                }
                _ = shutdown.fired() => {
                    tracing::info!("sweeper observed shutdown, exiting loop");
                    break;
                }
            }
        }
    }

    /// Convenience: build and spawn a sweeper subscribed to `shutdown`.
    pub fn spawn(
        router: Arc<Router<H>>,
        interval: Duration,
        shutdown: &Shutdown,
    ) -> JoinHandle<()> {
        let sweeper = Self::new(router, interval);
        let signal = shutdown.subscribe();
        tokio::spawn(sweeper.run(signal))
    }
}
