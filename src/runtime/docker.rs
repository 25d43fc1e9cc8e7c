use super::{ContainerRuntime, EventChannels};
use crate::error::{BridgeError, Result};
use crate::types::{ContainerIdentity, NetworkEvent};
use async_trait::async_trait;
use bollard::models::{ContainerInspectResponse, EventMessage};
use bollard::system::EventsOptions;
use bollard::Docker;
use futures_util::stream::{Stream, StreamExt};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

const CHANNEL_CAPACITY: usize = 128;
const RESUBSCRIBE_DELAY: Duration = Duration::from_secs(2);

pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connect to the local Docker daemon and make sure it answers.
    ///
    /// Honors `DOCKER_HOST`, otherwise uses the unix socket on Linux.
    pub async fn connect() -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| BridgeError::Connection(e.to_string()))?;
        let version = docker
            .version()
            .await
            .map_err(|e| BridgeError::Connection(e.to_string()))?;
        info!(
            "Connected to Docker {} (API {})",
            version.version.unwrap_or_default(),
            version.api_version.unwrap_or_default()
        );
        Ok(Self { docker })
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    fn subscribe(&self) -> EventChannels {
        let (event_tx, events) = mpsc::channel(CHANNEL_CAPACITY);
        let (error_tx, errors) = mpsc::channel(CHANNEL_CAPACITY);
        let docker = self.docker.clone();
        tokio::spawn(pump_events(
            move || docker.events(None::<EventsOptions<String>>),
            event_tx,
            error_tx,
        ));
        EventChannels { events, errors }
    }

    async fn inspect(&self, container_id: &str) -> Result<ContainerIdentity> {
        let detail = self
            .docker
            .inspect_container(container_id, None)
            .await
            .map_err(|e| BridgeError::Lookup {
                container: container_id.to_string(),
                reason: e.to_string(),
            })?;
        Ok(identity_from_inspect(detail, container_id))
    }
}

/// Why a forwarded stream stopped.
#[derive(Debug, PartialEq, Eq)]
enum StreamEnd {
    /// Docker closed the stream.
    Exhausted,
    /// One of the queues no longer has a receiver.
    ReceiverGone,
}

/// Keeps a Docker event subscription alive, resubscribing whenever the
/// stream ends. Returns once the receiving side has gone away.
async fn pump_events<F, S>(
    mut subscribe: F,
    event_tx: mpsc::Sender<NetworkEvent>,
    error_tx: mpsc::Sender<BridgeError>,
) where
    F: FnMut() -> S,
    S: Stream<Item = Result<EventMessage, bollard::errors::Error>>,
{
    loop {
        info!("Listening for Docker events...");
        if forward_stream(subscribe(), &event_tx, &error_tx).await == StreamEnd::ReceiverGone {
            debug!("Event receiver dropped, stopping Docker event pump");
            return;
        }
        if event_tx.is_closed() {
            return;
        }
        warn!(
            "Docker event stream ended. Resubscribing in {}s...",
            RESUBSCRIBE_DELAY.as_secs()
        );
        sleep(RESUBSCRIBE_DELAY).await;
    }
}

/// Splits one subscription into the event queue and the error queue.
async fn forward_stream<S>(
    stream: S,
    event_tx: &mpsc::Sender<NetworkEvent>,
    error_tx: &mpsc::Sender<BridgeError>,
) -> StreamEnd
where
    S: Stream<Item = Result<EventMessage, bollard::errors::Error>>,
{
    futures_util::pin_mut!(stream);
    while let Some(msg) = stream.next().await {
        let sent = match msg {
            Ok(message) => event_tx.send(network_event(message)).await.is_ok(),
            Err(e) => error_tx
                .send(BridgeError::Stream(e.to_string()))
                .await
                .is_ok(),
        };
        if !sent {
            return StreamEnd::ReceiverGone;
        }
    }
    StreamEnd::Exhausted
}

fn network_event(message: EventMessage) -> NetworkEvent {
    NetworkEvent {
        kind: message.typ.map(|t| t.to_string()).unwrap_or_default(),
        action: message.action.unwrap_or_default(),
        attributes: message
            .actor
            .and_then(|actor| actor.attributes)
            .unwrap_or_default(),
    }
}

fn identity_from_inspect(detail: ContainerInspectResponse, container_id: &str) -> ContainerIdentity {
    let name = detail
        .name
        .as_deref()
        .map(|n| n.trim_start_matches('/').to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| container_id.to_string());

    let mut addresses = HashMap::new();
    if let Some(networks) = detail.network_settings.and_then(|s| s.networks) {
        for (network, endpoint) in networks {
            let ipv4 = endpoint.ip_address.filter(|ip| !ip.is_empty());
            let ipv6 = endpoint.global_ipv6_address.filter(|ip| !ip.is_empty());
            if let Some(ip) = ipv4.or(ipv6) {
                addresses.insert(network, ip);
            }
        }
    }

    ContainerIdentity { name, addresses }
}
