// crates/shoal-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared helpers for shoal-core tests.
// Purpose: Provide instrumented connection doubles and sample configurations.
// Dependencies: shoal-core
// ============================================================================

//! ## Overview
//! Provides instrumented fakes for the connection and connector interfaces,
//! counting opens, closes, and destroys, plus sample configurations.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]
#![allow(dead_code, reason = "Helpers are shared across integration test binaries.")]

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use shoal_core::ClusterConfig;
use shoal_core::ClusterConnection;
use shoal_core::ClusterConnector;
use shoal_core::ConnectionError;
use shoal_core::SeedHost;

// ============================================================================
// SECTION: Sample Configurations
// ============================================================================

/// Creates the canonical single-host sample configuration.
pub fn sample_config() -> ClusterConfig {
    ClusterConfig::new(vec![SeedHost::new("10.0.0.1", 3000)], "alice")
}

/// Creates a configuration with the given hosts and user.
pub fn config_with(hosts: Vec<SeedHost>, user: &str) -> ClusterConfig {
    ClusterConfig::new(hosts, user)
}

// ============================================================================
// SECTION: Connection Counters
// ============================================================================

/// Counters recorded by fake connections and connectors.
#[derive(Debug, Default)]
pub struct FakeStats {
    /// Successful opens performed by the connector.
    pub opens: AtomicUsize,
    /// Graceful closes observed by connections.
    pub closes: AtomicUsize,
    /// Destroys observed by connections.
    pub destroys: AtomicUsize,
}

impl FakeStats {
    /// Returns the open count.
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Returns the close count.
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Returns the destroy count.
    pub fn destroys(&self) -> usize {
        self.destroys.load(Ordering::SeqCst)
    }
}

// ============================================================================
// SECTION: Fake Connection
// ============================================================================

/// Instrumented connection double.
pub struct FakeConnection {
    /// Configuration the connection was opened from.
    config: ClusterConfig,
    /// Shared counters.
    stats: Arc<FakeStats>,
}

impl ClusterConnection for FakeConnection {
    fn config(&self) -> &ClusterConfig {
        &self.config
    }

    fn close(&mut self) -> Result<(), ConnectionError> {
        self.stats.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn destroy(self: Box<Self>) {
        self.stats.destroys.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// SECTION: Fake Connector
// ============================================================================

/// Instrumented connector double.
pub struct FakeConnector {
    /// Shared counters handed to every opened connection.
    stats: Arc<FakeStats>,
    /// Whether opens are refused.
    fail_open: bool,
}

impl FakeConnector {
    /// Creates a connector whose opens succeed.
    pub fn new() -> Self {
        Self {
            stats: Arc::new(FakeStats::default()),
            fail_open: false,
        }
    }

    /// Creates a connector whose opens are refused.
    pub fn failing() -> Self {
        Self {
            stats: Arc::new(FakeStats::default()),
            fail_open: true,
        }
    }

    /// Returns the shared counters.
    pub fn stats(&self) -> Arc<FakeStats> {
        Arc::clone(&self.stats)
    }
}

impl Default for FakeConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterConnector for FakeConnector {
    fn open(&self, config: &ClusterConfig) -> Result<Box<dyn ClusterConnection>, ConnectionError> {
        if self.fail_open {
            return Err(ConnectionError::OpenFailed("refused by test connector".to_string()));
        }
        self.stats.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeConnection {
            config: config.clone(),
            stats: Arc::clone(&self.stats),
        }))
    }
}
