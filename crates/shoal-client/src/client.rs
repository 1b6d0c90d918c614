// crates/shoal-client/src/client.rs
// ============================================================================
// Module: Cluster Client Handle
// Description: Client handle lifecycle over shared or exclusive connections.
// Purpose: Implement the connect and close/release protocol for handles.
// Dependencies: shoal-core, thiserror, tracing
// ============================================================================

//! ## Overview
//! A client handle moves from `Disconnected` to `Connected` on connect and
//! back on close. While connected it holds exactly one attachment: a shared
//! attachment whose resource lives in a registry record, or an exclusively
//! owned connection that was never registered. Close re-derives the identity
//! key from the attachment's configuration and releases through the
//! registry on the shared path, or closes and destroys the resource directly
//! on the exclusive path; either way the handle ends disconnected.
//! Invariants:
//! - A handle never holds two attachments.
//! - Only the invalid-argument rejection leaves close without clearing
//!   handle state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use shoal_core::AcquireError;
use shoal_core::ClusterConfig;
use shoal_core::ClusterConnection;
use shoal_core::ClusterConnector;
use shoal_core::ConfigError;
use shoal_core::ConnectionError;
use shoal_core::ConnectionRegistry;
use shoal_core::IdentityKey;
use shoal_core::KeyError;
use shoal_core::ReleaseOutcome;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

// ============================================================================
// SECTION: Client Errors
// ============================================================================

/// Client handle errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The handle or its attachment is absent where one is required.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The cluster configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Identity key derivation failed.
    #[error(transparent)]
    Key(#[from] KeyError),
    /// Opening the cluster connection failed.
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

impl From<AcquireError> for ClientError {
    fn from(error: AcquireError) -> Self {
        match error {
            AcquireError::Key(error) => Self::Key(error),
            AcquireError::Connection(error) => Self::Connection(error),
        }
    }
}

// ============================================================================
// SECTION: Sharing Mode
// ============================================================================

/// Connection ownership selected at connect time.
///
/// # Invariants
/// - Fixed for the lifetime of the handle's attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharingMode {
    /// Share one cluster connection among identically configured handles.
    Shared,
    /// Own a private cluster connection, never registered for sharing.
    Exclusive,
}

// ============================================================================
// SECTION: Attachment
// ============================================================================

/// Attachment held by a connected handle.
enum Attachment {
    /// Shared attachment; the registry record owns the resource.
    Shared {
        /// Configuration used to re-derive the identity key on close.
        config: ClusterConfig,
    },
    /// Exclusively owned resource, never registered for sharing.
    Exclusive {
        /// The privately owned connection resource.
        connection: Box<dyn ClusterConnection>,
    },
}

// ============================================================================
// SECTION: Client Handle
// ============================================================================

/// Cluster client handle.
///
/// # Invariants
/// - Holds at most one attachment.
/// - `connected` is true exactly while an attachment is held.
pub struct Client {
    /// Registry this handle acquires from and releases to.
    registry: Arc<ConnectionRegistry>,
    /// Current attachment; absent once closed.
    attachment: Option<Attachment>,
    /// Connected flag, cleared unconditionally by close.
    connected: bool,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("connected", &self.connected)
            .field("attached", &self.attachment.is_some())
            .finish()
    }
}

impl Client {
    /// Connects a handle using the process-wide registry.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the configuration is invalid or the
    /// connection cannot be opened.
    pub fn connect(
        config: ClusterConfig,
        mode: SharingMode,
        connector: &dyn ClusterConnector,
    ) -> Result<Self, ClientError> {
        Self::connect_with_registry(ConnectionRegistry::global(), config, mode, connector)
    }

    /// Connects a handle against an explicitly provided registry.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the configuration is invalid or the
    /// connection cannot be opened.
    pub fn connect_with_registry(
        registry: Arc<ConnectionRegistry>,
        config: ClusterConfig,
        mode: SharingMode,
        connector: &dyn ClusterConnector,
    ) -> Result<Self, ClientError> {
        config.validate()?;
        let attachment = match mode {
            SharingMode::Shared => {
                let outcome = registry.acquire(&config, connector)?;
                debug!(user = %config.user, ?outcome, "connected shared cluster handle");
                Attachment::Shared {
                    config,
                }
            }
            SharingMode::Exclusive => {
                let connection = connector.open(&config)?;
                debug!(user = %config.user, "connected exclusive cluster handle");
                Attachment::Exclusive {
                    connection,
                }
            }
        };
        Ok(Self {
            registry,
            attachment: Some(attachment),
            connected: true,
        })
    }

    /// Reports whether the handle currently holds an attachment.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Closes the handle, releasing its attachment.
    ///
    /// Shared attachments are released through the registry, which
    /// decrements the record or, on the last reference, removes the entry
    /// and destroys the resource. Exclusive attachments are closed
    /// gracefully and then destroyed directly; the blocking teardown runs
    /// with no registry lock held. The attachment and connected flag are
    /// cleared before either branch runs, so the handle ends disconnected
    /// on every path past the precondition.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] when the handle holds no
    /// attachment; no state is touched in that case.
    pub fn close(&mut self) -> Result<(), ClientError> {
        let Some(attachment) = self.attachment.take() else {
            return Err(ClientError::InvalidArgument("client is not connected".to_string()));
        };
        self.connected = false;
        match attachment {
            Attachment::Shared {
                config,
            } => {
                let key = IdentityKey::from_config(&config)?;
                match self.registry.release(&key) {
                    ReleaseOutcome::Destroyed | ReleaseOutcome::Decremented => {}
                    ReleaseOutcome::NotFound => {
                        warn!(key = %key, "shared record missing on close; nothing left to release");
                    }
                }
            }
            Attachment::Exclusive {
                mut connection,
            } => {
                debug!(user = %connection.config().user, "closing exclusive cluster connection");
                if let Err(error) = connection.close() {
                    debug!(%error, "cluster close reported an error during teardown");
                }
                // Blocking teardown; the configuration and its host address
                // buffers are freed with the resource, exactly once.
                connection.destroy();
            }
        }
        Ok(())
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        // Best-effort release for handles dropped while still connected, so
        // a leaked handle cannot strand a reference count.
        if self.attachment.is_some() {
            let _ = self.close();
        }
    }
}
