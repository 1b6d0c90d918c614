// crates/shoal-client/src/lib.rs
// ============================================================================
// Module: Shoal Client Library
// Description: Cluster client handles over the shared-connection registry.
// Purpose: Connect and close client handles with shared or exclusive ownership.
// Dependencies: shoal-core, thiserror, tracing
// ============================================================================

//! ## Overview
//! Shoal Client provides the [`Client`] handle: it connects against a
//! cluster either by attaching to the process-wide shared-connection
//! registry or by owning a private connection, and its close path releases
//! whichever attachment it holds.
//! Invariants:
//! - A handle owns at most one attachment at a time.
//! - After a successful close the handle is disconnected; closing again is
//!   rejected without touching state.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::Client;
pub use client::ClientError;
pub use client::SharingMode;
