// crates/shoal-core/src/lib.rs
// ============================================================================
// Module: Shoal Core Library
// Description: Identity-keyed shared-connection registry for cluster clients.
// Purpose: Derive identity keys and reference-count shared cluster connections.
// Dependencies: serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! Shoal Core derives canonical identity keys from cluster configurations and
//! reference-counts shared cluster connections in a process-wide registry.
//! Client handles configured identically (same seed hosts in the same order,
//! same user identity) attach to one underlying connection; the last release
//! tears it down.
//! Invariants:
//! - Identical configurations derive byte-identical identity keys.
//! - A shared resource is destroyed exactly once, by the last release.
//! - Registry critical sections never span blocking connection I/O.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::config::ClusterConfig;
pub use crate::core::config::ConfigError;
pub use crate::core::config::SeedHost;
pub use crate::core::identity::IdentityKey;
pub use crate::core::identity::KeyError;
pub use crate::core::registry::AcquireError;
pub use crate::core::registry::AcquireOutcome;
pub use crate::core::registry::ConnectionRegistry;
pub use crate::core::registry::ReleaseOutcome;
pub use crate::core::registry::SharedStatus;
pub use crate::interfaces::ClusterConnection;
pub use crate::interfaces::ClusterConnector;
pub use crate::interfaces::ConnectionError;
