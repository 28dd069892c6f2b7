//! Error types for the Galley provisioner.

use crate::types::{InstanceName, Transport};
use std::io;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Galley provisioner.
#[derive(Error, Debug)]
pub enum Error {
    /// Guest-address discovery yielded no candidate addresses at all.
    ///
    /// Raised when a finder returns an empty list while resolving a
    /// loopback-placeholder hostname. Aborts descriptor preparation.
    #[error("Unable to retrieve IPs")]
    AddressDiscoveryFailed,

    /// No finder is registered for the given transport.
    #[error("No finder registered for transport: {0}")]
    UnknownTransport(Transport),

    /// No connection state has been persisted for the given instance.
    #[error("No persisted state for instance: {0}")]
    StateNotFound(InstanceName),

    /// A transport finder failed while discovering addresses or FQDN.
    #[error("Discovery failed: {0}")]
    Discovery(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error came from the discovery layer.
    pub fn is_discovery(&self) -> bool {
        matches!(
            self,
            Error::AddressDiscoveryFailed | Error::UnknownTransport(_) | Error::Discovery(_)
        )
    }

    /// Check if this error indicates a missing instance state entry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::StateNotFound(_))
    }
}
