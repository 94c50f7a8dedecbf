//! Shutdown coordination for background tasks.

use tokio::sync::watch;

/// Latched shutdown signal.
///
/// Long-running tasks (the deadline sweeper, anything the embedding
/// application adds) subscribe and exit their loops when the signal fires.
/// The signal is a latch, not an event: a task that subscribes *after*
/// [`Shutdown::trigger`] still observes it immediately, so spawn order never
/// matters during teardown.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Latch the signal. Idempotent; firing with no subscribers is fine.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    /// Whether the signal has been latched.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Number of tasks still subscribed.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// One task's view of the shutdown latch.
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Resolve once the signal is latched; immediate if it already was.
    /// A dropped [`Shutdown`] counts as latched.
    pub async fn fired(&mut self) {
        let _ = self.rx.wait_for(|latched| *latched).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_late_subscriber_observes_latched_signal() {
        let shutdown = Shutdown::new();
        shutdown.trigger();
        assert!(shutdown.is_triggered());

        let mut signal = shutdown.subscribe();
        // Must resolve immediately, not wait for another trigger.
        tokio::time::timeout(std::time::Duration::from_secs(1), signal.fired())
            .await
            .expect("latched signal not observed by late subscriber");
    }

    #[tokio::test]
    async fn test_dropped_coordinator_counts_as_latched() {
        let shutdown = Shutdown::new();
        let mut signal = shutdown.subscribe();
        drop(shutdown);
        tokio::time::timeout(std::time::Duration::from_secs(1), signal.fired())
            .await
            .expect("dropped coordinator did not release subscriber");
    }
}
