//! Data structures passed between the runtime adapter and the pipeline.
//!
//! None of these are persisted. Events are consumed once, inspection
//! snapshots are fetched per event and dropped afterwards.

use std::collections::HashMap;
use std::fmt;

/// Event attribute carrying the network name.
pub const ATTR_NETWORK_NAME: &str = "name";
/// Event attribute carrying the affected container id on connect actions.
pub const ATTR_CONTAINER: &str = "container";

/// A notification from the container runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkEvent {
    /// Event category, e.g. `network` or `container`.
    pub kind: String,
    /// Action within the category, e.g. `connect`.
    pub action: String,
    pub attributes: HashMap<String, String>,
}

impl NetworkEvent {
    #[cfg(test)]
    pub fn new(kind: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            action: action.into(),
            attributes: HashMap::new(),
        }
    }

    #[cfg(test)]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn network_name(&self) -> Option<&str> {
        self.attributes.get(ATTR_NETWORK_NAME).map(String::as_str)
    }

    pub fn container_id(&self) -> Option<&str> {
        self.attributes.get(ATTR_CONTAINER).map(String::as_str)
    }

    /// Returns true iff this event reports a container joining `network`.
    pub fn is_network_connect(&self, network: &str) -> bool {
        self.kind == "network" && self.action == "connect" && self.network_name() == Some(network)
    }
}

/// Point-in-time inspection result for a container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerIdentity {
    /// Display name, without Docker's leading `/`.
    pub name: String,
    /// Address per attached network. Networks without an address are absent.
    pub addresses: HashMap<String, String>,
}

/// A single record handed to the announcer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishRequest {
    pub fqdn: String,
    /// An address for the canonical record, a hostname for the alias record.
    pub value: String,
}

impl PublishRequest {
    pub fn new(fqdn: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            fqdn: fqdn.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for PublishRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.fqdn, self.value)
    }
}
