//! Shared test fixtures.
#![allow(dead_code)] // not every test binary uses every helper

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use muxpool::{BoxError, RouteHandler};

/// Handler that counts lifecycle events and records timeout deliveries.
#[derive(Default)]
pub struct TestHandler {
    created: AtomicUsize,
    destroyed: AtomicUsize,
    timeouts: Mutex<Vec<(u64, Option<String>)>>,
    failing: Mutex<HashSet<String>>,
}

impl TestHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make `create` fail for `key` from now on.
    pub fn fail_key(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_string());
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub fn timeouts(&self) -> Vec<(u64, Option<String>)> {
        self.timeouts.lock().unwrap().clone()
    }
}

impl RouteHandler for TestHandler {
    type Key = String;
    type Seq = u64;
    type Task = String;
    type Channel = Arc<String>;

    fn create(&self, key: &String) -> Result<Arc<String>, BoxError> {
        if self.failing.lock().unwrap().contains(key) {
            return Err(format!("injected failure for {key}").into());
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(format!("chan-{key}")))
    }

    fn destroy(&self, _key: &String, _channel: Arc<String>) {
        self.destroyed.fetch_add(1, Ordering::SeqCst);
    }

    fn on_timeout(&self, seq: u64, task: Option<String>) {
        self.timeouts.lock().unwrap().push((seq, task));
    }
}
