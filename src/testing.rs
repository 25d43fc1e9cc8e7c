//! In-memory runtime and announcer used by the pipeline tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::announcer::Announcer;
use crate::error::{BridgeError, Result};
use crate::runtime::{ContainerRuntime, EventChannels};
use crate::types::{ContainerIdentity, PublishRequest};

#[derive(Default)]
pub struct FakeRuntime {
    containers: HashMap<String, ContainerIdentity>,
    inspected: Mutex<Vec<String>>,
}

impl FakeRuntime {
    pub fn with_container(mut self, id: &str, name: &str, addresses: &[(&str, &str)]) -> Self {
        let identity = ContainerIdentity {
            name: name.to_string(),
            addresses: addresses
                .iter()
                .map(|(net, ip)| (net.to_string(), ip.to_string()))
                .collect(),
        };
        self.containers.insert(id.to_string(), identity);
        self
    }

    pub fn inspected(&self) -> Vec<String> {
        self.inspected.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    fn subscribe(&self) -> EventChannels {
        let (_, events) = mpsc::channel(1);
        let (_, errors) = mpsc::channel(1);
        EventChannels { events, errors }
    }

    async fn inspect(&self, container_id: &str) -> Result<ContainerIdentity> {
        self.inspected.lock().unwrap().push(container_id.to_string());
        self.containers
            .get(container_id)
            .cloned()
            .ok_or_else(|| BridgeError::Lookup {
                container: container_id.to_string(),
                reason: "No such container".to_string(),
            })
    }
}

/// Records every publish call; values listed in `failing` are rejected.
#[derive(Default)]
pub struct RecordingAnnouncer {
    calls: Mutex<Vec<PublishRequest>>,
    failing: HashSet<String>,
}

impl RecordingAnnouncer {
    pub fn failing_on(value: &str) -> Self {
        Self {
            failing: HashSet::from([value.to_string()]),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<PublishRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Announcer for RecordingAnnouncer {
    async fn publish(&self, request: &PublishRequest) -> Result<()> {
        self.calls.lock().unwrap().push(request.clone());
        if self.failing.contains(&request.value) {
            return Err(BridgeError::Publish {
                fqdn: request.fqdn.clone(),
                value: request.value.clone(),
                reason: "announcer exited with status 1".to_string(),
            });
        }
        Ok(())
    }
}
