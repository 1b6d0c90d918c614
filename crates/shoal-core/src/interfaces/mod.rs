// crates/shoal-core/src/interfaces/mod.rs
// ============================================================================
// Module: Shoal Interfaces
// Description: Backend-agnostic interfaces for cluster connection resources.
// Purpose: Define the contract surface the registry and client handles consume.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how Shoal reaches the underlying cluster-connection
//! implementation without embedding protocol details. The connection is an
//! opaque resource with a graceful close and a consuming, potentially
//! blocking destroy; the connector is the factory the open path reaches
//! through. Implementations must tolerate a close before destroy.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::config::ClusterConfig;

// ============================================================================
// SECTION: Connection Errors
// ============================================================================

/// Errors reported by cluster connection resources.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Opening a cluster connection failed.
    #[error("cluster open failed: {0}")]
    OpenFailed(String),
    /// Graceful close reported a protocol-level failure.
    #[error("cluster close failed: {0}")]
    CloseFailed(String),
}

// ============================================================================
// SECTION: Cluster Connection
// ============================================================================

/// Opaque handle to one opened cluster connection resource.
pub trait ClusterConnection: Send {
    /// Returns the configuration the connection was opened from.
    fn config(&self) -> &ClusterConfig;

    /// Gracefully closes the connection at the protocol level.
    ///
    /// Safe to call before [`ClusterConnection::destroy`]; implementations
    /// must tolerate repeated calls.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] when the protocol-level close fails. The
    /// release protocol does not branch on this error.
    fn close(&mut self) -> Result<(), ConnectionError>;

    /// Releases all resource-level memory and sockets.
    ///
    /// May block on I/O teardown. Callers must not hold a process-wide lock
    /// across this call.
    fn destroy(self: Box<Self>);
}

// ============================================================================
// SECTION: Cluster Connector
// ============================================================================

/// Factory that opens cluster connections from a configuration.
pub trait ClusterConnector: Send + Sync {
    /// Opens a new cluster connection for the configuration.
    ///
    /// May block on connection establishment. Callers must not hold a
    /// process-wide lock across this call.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] when the cluster cannot be reached or
    /// refuses the configuration.
    fn open(&self, config: &ClusterConfig) -> Result<Box<dyn ClusterConnection>, ConnectionError>;
}
