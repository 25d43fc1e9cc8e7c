//! The event loop.
//!
//! [`Bridge::run`] waits on the runtime's event and error queues plus a
//! shutdown signal. Each event runs through classify, resolve, derive and
//! publish before the next item is taken, so events are handled strictly
//! in arrival order. Failures never leave the event they belong to.
//!
//! Repeated connect events for the same container publish the same
//! records again. No record of earlier publishes is kept.

use std::fmt;
use std::future::Future;

use log::{debug, error, info, trace, warn};

use crate::announcer::Announcer;
use crate::config::Config;
use crate::error::{BridgeError, Result};
use crate::naming::{HostnameSet, NamingConfig};
use crate::resolver::resolve_container;
use crate::runtime::{ContainerRuntime, EventChannels};
use crate::types::{NetworkEvent, PublishRequest};

/// What happened to a single event.
#[derive(Debug)]
pub enum EventOutcome {
    /// Not a connect event for the target network.
    Ignored,
    /// Matched but could not be resolved; nothing was published.
    Dropped(BridgeError),
    /// Both records were attempted, each with its own result.
    Published {
        canonical: Result<()>,
        alias: Result<()>,
    },
}

impl fmt::Display for EventOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn status(result: &Result<()>) -> &'static str {
            if result.is_ok() {
                "ok"
            } else {
                "failed"
            }
        }

        match self {
            EventOutcome::Ignored => write!(f, "ignored"),
            EventOutcome::Dropped(e) => write!(f, "dropped ({})", e),
            EventOutcome::Published { canonical, alias } => write!(
                f,
                "published (record {}, alias {})",
                status(canonical),
                status(alias)
            ),
        }
    }
}

pub struct Bridge<R, A> {
    runtime: R,
    announcer: A,
    network_name: String,
    naming: NamingConfig,
}

impl<R, A> Bridge<R, A>
where
    R: ContainerRuntime,
    A: Announcer,
{
    pub fn new(runtime: R, announcer: A, config: &Config) -> Self {
        Self {
            runtime,
            announcer,
            network_name: config.network_name.clone(),
            naming: config.naming(),
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Run until `shutdown` resolves or the event queue closes.
    ///
    /// An event already being processed is finished before shutdown is
    /// observed.
    pub async fn run<F>(&self, channels: EventChannels, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let EventChannels {
            mut events,
            mut errors,
        } = channels;
        let mut errors_open = true;
        tokio::pin!(shutdown);

        info!(
            "Watching network {} for container connections",
            self.network_name
        );
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested, leaving event loop");
                    break;
                }
                err = errors.recv(), if errors_open => match err {
                    Some(e) => error!("Error from events channel: {}", e),
                    None => errors_open = false,
                },
                event = events.recv() => match event {
                    Some(event) => match self.handle_event(&event).await {
                        EventOutcome::Ignored => {}
                        outcome => debug!(
                            "{} event for {}: {}",
                            event.action,
                            event.container_id().unwrap_or("<unknown>"),
                            outcome
                        ),
                    },
                    None => {
                        warn!("Event source closed, leaving event loop");
                        break;
                    }
                },
            }
        }
    }

    pub async fn handle_event(&self, event: &NetworkEvent) -> EventOutcome {
        if !event.is_network_connect(&self.network_name) {
            trace!("Ignoring {} {} event", event.kind, event.action);
            return EventOutcome::Ignored;
        }

        let Some(container_id) = event.container_id() else {
            let err = BridgeError::MalformedEvent(format!(
                "connect event on {} without a container attribute",
                self.network_name
            ));
            warn!("Dropping event: {}", err);
            return EventOutcome::Dropped(err);
        };
        debug!("Container {} connected to {}", container_id, self.network_name);

        let container =
            match resolve_container(&self.runtime, container_id, &self.network_name).await {
                Ok(container) => container,
                Err(e) => {
                    warn!("Dropping connect event for {}: {}", container_id, e);
                    return EventOutcome::Dropped(e);
                }
            };

        let names = HostnameSet::derive(&container.name, &self.naming);
        let [record, alias] = names.publish_requests(&container.address);
        EventOutcome::Published {
            canonical: self.publish("record", &record).await,
            alias: self.publish("alias", &alias).await,
        }
    }

    async fn publish(&self, kind: &str, request: &PublishRequest) -> Result<()> {
        let result = self.announcer.publish(request).await;
        match &result {
            Ok(()) => info!("Published {} {}", kind, request),
            Err(e) => error!("Error publishing {}: {}", kind, e),
        }
        result
    }
}
