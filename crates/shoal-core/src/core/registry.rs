// crates/shoal-core/src/core/registry.rs
// ============================================================================
// Module: Shared-Connection Registry
// Description: Process-wide reference-counted registry of cluster connections.
// Purpose: Let identically configured handles share one cluster connection.
// Dependencies: crate::core::{config, identity}, crate::interfaces, thiserror, tracing
// ============================================================================

//! ## Overview
//! The registry maps identity keys to reference-counted records, each owning
//! exactly one opened cluster connection. The open path attaches to an
//! existing record or registers a new one with count 1; each close releases
//! one reference, and the release that finds the last reference removes the
//! entry and destroys the resource.
//! Invariants:
//! - Every check, decrement, and removal against an entry runs under the
//!   map lock; lookup-then-act is a single critical section.
//! - Blocking opens and blocking teardown never run while the lock is held.
//! - `release` is the only path that destroys a shared connection, and it
//!   never destroys one still referenced by another handle.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::OnceLock;
use std::sync::PoisonError;

use thiserror::Error;
use tracing::debug;

use crate::core::config::ClusterConfig;
use crate::core::identity::IdentityKey;
use crate::core::identity::KeyError;
use crate::interfaces::ClusterConnection;
use crate::interfaces::ClusterConnector;
use crate::interfaces::ConnectionError;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of releasing one reference for a key.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The last reference was released; the entry was removed and the
    /// resource closed and destroyed.
    Destroyed,
    /// Other references remain; the count was decremented and the resource
    /// left open.
    Decremented,
    /// No entry exists for the key.
    NotFound,
}

/// Result of acquiring a reference for a configuration.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// A new connection was opened and registered with count 1.
    Opened,
    /// An existing record was attached to; its count was incremented.
    Attached,
}

/// Snapshot of a shared record, observed under the registry lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedStatus {
    /// Reference count at observation time; always >= 1.
    pub ref_count: u64,
}

// ============================================================================
// SECTION: Acquire Errors
// ============================================================================

/// Errors raised by the registry acquire path.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// Identity key derivation failed.
    #[error(transparent)]
    Key(#[from] KeyError),
    /// Opening the cluster connection failed.
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Record wrapping one opened cluster connection and its reference count.
struct SharedEntry {
    /// The single opened resource owned by this record.
    connection: Box<dyn ClusterConnection>,
    /// Number of client handles attached to this record; always >= 1.
    ref_count: u64,
}

/// Process-wide registry of shared cluster connections keyed by identity.
///
/// # Invariants
/// - Entries are added by `acquire` with count 1 and removed exactly when a
///   `release` finds count 1.
/// - The map lock is never held across blocking connection I/O.
pub struct ConnectionRegistry {
    /// Identity key to shared-record map.
    entries: Mutex<HashMap<IdentityKey, SharedEntry>>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the process-wide registry instance.
    #[must_use]
    pub fn global() -> Arc<Self> {
        /// Lazily initialized process-wide instance.
        static GLOBAL: OnceLock<Arc<ConnectionRegistry>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }

    /// Locks the entry map, recovering a poisoned guard.
    ///
    /// Counts and entries are updated in place under the guard, so the map
    /// stays structurally valid even when a holder panicked.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<IdentityKey, SharedEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Observes the record for a key without mutating it.
    #[must_use]
    pub fn lookup(&self, key: &IdentityKey) -> Option<SharedStatus> {
        self.lock_entries().get(key).map(|entry| SharedStatus {
            ref_count: entry.ref_count,
        })
    }

    /// Attaches to an existing record or opens and registers a new one.
    ///
    /// The connector's blocking open runs without the map lock. When a
    /// concurrent acquire registers the same key first, the existing record
    /// is attached instead and the surplus connection is torn down, also
    /// outside the lock.
    ///
    /// # Errors
    ///
    /// Returns [`AcquireError`] when key derivation or the open fails.
    pub fn acquire(
        &self,
        config: &ClusterConfig,
        connector: &dyn ClusterConnector,
    ) -> Result<AcquireOutcome, AcquireError> {
        let key = IdentityKey::from_config(config)?;
        {
            let mut entries = self.lock_entries();
            if let Some(entry) = entries.get_mut(&key) {
                entry.ref_count += 1;
                debug!(key = %key, ref_count = entry.ref_count, "attached to shared connection");
                return Ok(AcquireOutcome::Attached);
            }
        }

        let connection = connector.open(config)?;

        let mut entries = self.lock_entries();
        if let Some(entry) = entries.get_mut(&key) {
            entry.ref_count += 1;
            let ref_count = entry.ref_count;
            drop(entries);
            debug!(key = %key, ref_count, "lost open race; tearing down surplus connection");
            tear_down(connection);
            return Ok(AcquireOutcome::Attached);
        }
        debug!(key = %key, "registered shared connection");
        entries.insert(key, SharedEntry {
            connection,
            ref_count: 1,
        });
        Ok(AcquireOutcome::Opened)
    }

    /// Releases one reference for the key.
    ///
    /// With a count above one the record is decremented and left in place,
    /// connection open. On the last reference the entry is removed under the
    /// lock and the resource is closed and destroyed after the guard drops,
    /// so no other handle can observe a destroyed entry or block behind the
    /// teardown.
    #[must_use = "the outcome distinguishes the shared path from the safety net"]
    pub fn release(&self, key: &IdentityKey) -> ReleaseOutcome {
        let mut entries = self.lock_entries();
        let Some(entry) = entries.get_mut(key) else {
            return ReleaseOutcome::NotFound;
        };
        if entry.ref_count > 1 {
            entry.ref_count -= 1;
            debug!(key = %key, ref_count = entry.ref_count, "released shared connection reference");
            return ReleaseOutcome::Decremented;
        }
        // Last reference: the entry leaves the map before the guard drops,
        // so removal and destruction are one logical step.
        let removed = entries.remove(key);
        drop(entries);
        if let Some(entry) = removed {
            debug!(key = %key, "destroying shared connection");
            tear_down(entry.connection);
        }
        ReleaseOutcome::Destroyed
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// SECTION: Teardown
// ============================================================================

/// Closes and destroys a connection resource.
///
/// Close failures are logged and do not skip the destroy; teardown always
/// runs to completion.
fn tear_down(mut connection: Box<dyn ClusterConnection>) {
    if let Err(error) = connection.close() {
        debug!(%error, "cluster close reported an error during teardown");
    }
    connection.destroy();
}
