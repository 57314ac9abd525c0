//! Debugging counters for the client libraries.
//!
//! Counters are keyed `<label>.<outcome>` (for example `heartbeat.success`)
//! and grouped by category: `discovery`, `web` and `webrtc`.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

pub const DISCOVERY: &str = "discovery";
pub const WEB: &str = "web";
pub const WEBRTC: &str = "webrtc";

static GLOBAL: Lazy<DiagnosticsRegistry> = Lazy::new(DiagnosticsRegistry::new);

#[derive(Debug, Default)]
pub struct Diagnostics {
    counter: Mutex<BTreeMap<String, u64>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self, key: &str) {
        let mut counter = self.counter.lock().unwrap_or_else(|e| e.into_inner());
        *counter.entry(key.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, key: &str) -> u64 {
        let counter = self.counter.lock().unwrap_or_else(|e| e.into_inner());
        counter.get(key).copied().unwrap_or(0)
    }

    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.counter
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn reset(&self) {
        self.counter
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

/// One set of counters per client category.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsRegistry {
    discovery: Arc<Diagnostics>,
    web: Arc<Diagnostics>,
    webrtc: Arc<Diagnostics>,
}

impl DiagnosticsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by clients that were not given their own.
    pub fn global() -> &'static DiagnosticsRegistry {
        &GLOBAL
    }

    pub fn discovery(&self) -> Arc<Diagnostics> {
        Arc::clone(&self.discovery)
    }

    pub fn web(&self) -> Arc<Diagnostics> {
        Arc::clone(&self.web)
    }

    pub fn webrtc(&self) -> Arc<Diagnostics> {
        Arc::clone(&self.webrtc)
    }

    pub fn snapshot(&self) -> BTreeMap<String, BTreeMap<String, u64>> {
        BTreeMap::from([
            (DISCOVERY.to_string(), self.discovery.snapshot()),
            (WEB.to_string(), self.web.snapshot()),
            (WEBRTC.to_string(), self.webrtc.snapshot()),
        ])
    }

    pub fn reset(&self) {
        self.discovery.reset();
        self.web.reset();
        self.webrtc.reset();
    }
}

/// Snapshot of the process-wide registry.
pub fn get_diagnostics() -> BTreeMap<String, BTreeMap<String, u64>> {
    DiagnosticsRegistry::global().snapshot()
}
