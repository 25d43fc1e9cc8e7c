//! Error types for the bridge.
//!
//! Only [`BridgeError::Connection`] and [`BridgeError::Config`] are fatal,
//! and only at startup. Everything else is scoped to a single event or a
//! single record and ends up in the log.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The container runtime could not be reached at startup.
    #[error("failed to connect to container runtime: {0}")]
    Connection(String),

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Error surfaced on the runtime's event stream.
    #[error("event stream error: {0}")]
    Stream(String),

    /// A connect event on the target network without a container id.
    #[error("malformed event: {0}")]
    MalformedEvent(String),

    /// Container inspection failed, e.g. the container is already gone.
    #[error("failed to inspect container {container}: {reason}")]
    Lookup { container: String, reason: String },

    /// The container has no usable attachment to the target network.
    #[error("container {container} has no address on network {network}")]
    MissingNetworkAttachment { container: String, network: String },

    /// The announcer could not be started or exited with a failure.
    #[error("failed to publish {fqdn} -> {value}: {reason}")]
    Publish {
        fqdn: String,
        value: String,
        reason: String,
    },
}

pub type Result<T, E = BridgeError> = std::result::Result<T, E>;
