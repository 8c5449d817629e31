//! Bridge configuration.

use crate::registry;
use std::sync::atomic::{AtomicBool, Ordering};

/// Default cap on live stream, map and list handles.
pub const DEFAULT_HANDLE_LIMIT: usize = 65_536;

static TRACE_READS: AtomicBool = AtomicBool::new(false);

/// Configuration for the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Maximum number of live stream, map and list handles. Error handles
    /// are not counted, so a failure can always be reported.
    pub handle_limit: usize,
    /// Emit a `trace` event for every byte read.
    pub trace_reads: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            handle_limit: DEFAULT_HANDLE_LIMIT,
            trace_reads: false,
        }
    }
}

impl BridgeConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let handle_limit = std::env::var("HUSK_HANDLE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_HANDLE_LIMIT);

        let trace_reads = std::env::var("HUSK_TRACE_READS")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        Self {
            handle_limit,
            trace_reads,
        }
    }

    /// Create a builder for configuration.
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::default()
    }
}

/// Builder for bridge configuration.
#[derive(Debug, Default)]
pub struct BridgeConfigBuilder {
    config: BridgeConfig,
}

impl BridgeConfigBuilder {
    pub fn handle_limit(mut self, limit: usize) -> Self {
        self.config.handle_limit = limit.max(1);
        self
    }

    pub fn trace_reads(mut self, trace: bool) -> Self {
        self.config.trace_reads = trace;
        self
    }

    pub fn build(self) -> BridgeConfig {
        self.config
    }
}

/// Apply a configuration to the process-wide bridge. Handles that are
/// already live stay live even if the new limit is lower.
pub fn configure(config: &BridgeConfig) {
    registry::with_registry(|reg| reg.set_limit(config.handle_limit));
    configure_reads(config);
    tracing::debug!(
        handle_limit = config.handle_limit,
        trace_reads = config.trace_reads,
        "bridge configured"
    );
}

pub(crate) fn configure_reads(config: &BridgeConfig) {
    TRACE_READS.store(config.trace_reads, Ordering::Relaxed);
}

pub(crate) fn trace_reads() -> bool {
    TRACE_READS.load(Ordering::Relaxed)
}
