// crates/shoal-core/src/core/config.rs
// ============================================================================
// Module: Cluster Configuration
// Description: Seed host lists and user identity for cluster connections.
// Purpose: Provide the immutable configuration a cluster connection is opened from.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A cluster is addressed by an ordered list of seed hosts plus the
//! authenticating user identity. Host order is significant: it participates
//! in identity-key derivation, so the same hosts in a different order name a
//! different sharing group. A configuration is immutable once a connection
//! has been opened from it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Seed Hosts
// ============================================================================

/// One seed host entry: address and port.
///
/// # Invariants
/// - `address` is an opaque hostname or IP literal; it is not resolved or
///   normalized here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeedHost {
    /// Hostname or IP address of the seed node.
    pub address: String,
    /// TCP port of the seed node.
    pub port: u16,
}

impl SeedHost {
    /// Creates a seed host entry.
    #[must_use]
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }
}

// ============================================================================
// SECTION: Configuration Errors
// ============================================================================

/// Cluster configuration validation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The seed host list is empty.
    #[error("cluster config requires at least one seed host")]
    NoSeedHosts,
    /// A seed host has an empty address.
    #[error("seed host {index} has an empty address")]
    EmptyAddress {
        /// Position of the offending host in the seed list.
        index: usize,
    },
}

// ============================================================================
// SECTION: Cluster Configuration
// ============================================================================

/// Immutable configuration a cluster connection is opened from.
///
/// # Invariants
/// - `hosts` order is significant and preserved.
/// - Not mutated after a connection has been opened from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Ordered seed host list.
    pub hosts: Vec<SeedHost>,
    /// Authenticating user identity.
    pub user: String,
}

impl ClusterConfig {
    /// Creates a configuration from an ordered host list and user identity.
    #[must_use]
    pub fn new(hosts: Vec<SeedHost>, user: impl Into<String>) -> Self {
        Self {
            hosts,
            user: user.into(),
        }
    }

    /// Validates the configuration for use by the open path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the host list is empty or a host has an
    /// empty address.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hosts.is_empty() {
            return Err(ConfigError::NoSeedHosts);
        }
        for (index, host) in self.hosts.iter().enumerate() {
            if host.address.is_empty() {
                return Err(ConfigError::EmptyAddress {
                    index,
                });
            }
        }
        Ok(())
    }
}
