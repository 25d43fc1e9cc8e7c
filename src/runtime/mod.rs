use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::{BridgeError, Result};
use crate::types::{ContainerIdentity, NetworkEvent};

pub mod docker;
pub use docker::DockerRuntime;

/// The two inbound queues of a runtime subscription.
pub struct EventChannels {
    pub events: mpsc::Receiver<NetworkEvent>,
    pub errors: mpsc::Receiver<BridgeError>,
}

#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Subscribe to all runtime events. No filtering happens on the runtime side.
    fn subscribe(&self) -> EventChannels;

    /// Inspect a container by id or name.
    async fn inspect(&self, container_id: &str) -> Result<ContainerIdentity>;
}
