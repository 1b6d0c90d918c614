// crates/shoal-core/src/core/identity.rs
// ============================================================================
// Module: Identity Key
// Description: Canonical identity key derived from a cluster configuration.
// Purpose: Give identically configured handles a byte-identical sharing key.
// Dependencies: crate::core::config, thiserror
// ============================================================================

//! ## Overview
//! The identity key is the registry's sharing key: a deterministic rendering
//! of a cluster configuration as `address:port:user;` for every seed host in
//! declared order. Two configurations with the same hosts in the same order
//! and the same user derive byte-identical keys; reordering hosts, changing
//! any port, or changing the user derives a different key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fmt::Write;

use thiserror::Error;

use crate::core::config::ClusterConfig;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Reserved width for a decimal port rendering: five digits for a 16-bit
/// port plus one byte of margin.
const PORT_FIELD_WIDTH: usize = 6;

/// Delimiter bytes contributed per host (`:`, `:`, `;`).
const DELIMITERS_PER_HOST: usize = 3;

// ============================================================================
// SECTION: Key Errors
// ============================================================================

/// Identity key derivation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The configuration has no seed hosts; no key exists for it.
    #[error("identity key requires at least one seed host")]
    NoSeedHosts,
}

// ============================================================================
// SECTION: Identity Key
// ============================================================================

/// Canonical sharing key for a cluster configuration.
///
/// # Invariants
/// - Opaque UTF-8 string; only derived via [`IdentityKey::from_config`].
/// - Byte-identical for identical configurations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Derives the identity key for a cluster configuration.
    ///
    /// Renders `address`, `:`, the decimal port, `:`, the user identity and
    /// a trailing `;` for every host in declared order. The buffer is
    /// pre-sized as the sum over hosts of address length, user length, the
    /// reserved port field width, and the per-host delimiters.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::NoSeedHosts`] when the host list is empty.
    pub fn from_config(config: &ClusterConfig) -> Result<Self, KeyError> {
        if config.hosts.is_empty() {
            return Err(KeyError::NoSeedHosts);
        }
        let capacity: usize = config
            .hosts
            .iter()
            .map(|host| host.address.len() + config.user.len() + PORT_FIELD_WIDTH + DELIMITERS_PER_HOST)
            .sum();
        let mut key = String::with_capacity(capacity);
        for host in &config.hosts {
            // Writing into a String cannot fail; the buffer grows past the
            // estimate if an address outruns it.
            let _ = write!(key, "{}:{}:{};", host.address, host.port, config.user);
        }
        Ok(Self(key))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
