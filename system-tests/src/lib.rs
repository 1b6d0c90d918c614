// system-tests/src/lib.rs
// ============================================================================
// Module: Shoal System Test Support
// Description: Instrumented doubles shared by the system test suites.
// Purpose: Count opens, closes, and destroys across end-to-end scenarios.
// Dependencies: shoal-core
// ============================================================================

//! ## Overview
//! Test support for the Shoal system suites: an instrumented
//! [`ClusterConnector`] whose connections record every open, graceful close,
//! and destroy, plus the canonical scenario configuration used across the
//! suites.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use shoal_core::ClusterConfig;
use shoal_core::ClusterConnection;
use shoal_core::ClusterConnector;
use shoal_core::ConnectionError;
use shoal_core::SeedHost;

// ============================================================================
// SECTION: Scenario Configuration
// ============================================================================

/// Returns the canonical scenario configuration: one seed host
/// `10.0.0.1:3000` and user `alice`.
#[must_use]
pub fn scenario_config() -> ClusterConfig {
    ClusterConfig::new(vec![SeedHost::new("10.0.0.1", 3000)], "alice")
}

// ============================================================================
// SECTION: Lifecycle Counters
// ============================================================================

/// Lifecycle counters shared between a connector and its connections.
#[derive(Debug, Default)]
pub struct LifecycleStats {
    /// Successful opens performed by the connector.
    opens: AtomicUsize,
    /// Graceful closes observed by connections.
    closes: AtomicUsize,
    /// Destroys observed by connections.
    destroys: AtomicUsize,
}

impl LifecycleStats {
    /// Returns the open count.
    #[must_use]
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Returns the close count.
    #[must_use]
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Returns the destroy count.
    #[must_use]
    pub fn destroys(&self) -> usize {
        self.destroys.load(Ordering::SeqCst)
    }
}

// ============================================================================
// SECTION: Instrumented Connection
// ============================================================================

/// Connection double that records its lifecycle transitions.
struct InstrumentedConnection {
    /// Configuration the connection was opened from.
    config: ClusterConfig,
    /// Shared lifecycle counters.
    stats: Arc<LifecycleStats>,
}

impl ClusterConnection for InstrumentedConnection {
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
// SECTION: Instrumented Connector
// ============================================================================

/// Connector double whose opened connections record their lifecycle.
pub struct InstrumentedConnector {
    /// Shared lifecycle counters handed to every opened connection.
    stats: Arc<LifecycleStats>,
}

impl InstrumentedConnector {
    /// Creates a connector with fresh counters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stats: Arc::new(LifecycleStats::default()),
        }
    }

    /// Returns the shared lifecycle counters.
    #[must_use]
    pub fn stats(&self) -> Arc<LifecycleStats> {
        Arc::clone(&self.stats)
    }
}

impl Default for InstrumentedConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterConnector for InstrumentedConnector {
    fn open(&self, config: &ClusterConfig) -> Result<Box<dyn ClusterConnection>, ConnectionError> {
        self.stats.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InstrumentedConnection {
            config: config.clone(),
            stats: Arc::clone(&self.stats),
        }))
    }
}
