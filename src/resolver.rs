//! Container lookup for a single network.

use crate::error::{BridgeError, Result};
use crate::runtime::ContainerRuntime;

/// Display name and address of a container on the target network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContainer {
    pub name: String,
    pub address: String,
}

/// Inspect `container_id` and pick its address on `network`.
///
/// A container that disconnected between the event and the inspection
/// yields [`BridgeError::MissingNetworkAttachment`].
pub async fn resolve_container<R>(
    runtime: &R,
    container_id: &str,
    network: &str,
) -> Result<ResolvedContainer>
where
    R: ContainerRuntime + ?Sized,
{
    let mut identity = runtime.inspect(container_id).await?;
    let address = identity.addresses.remove(network).ok_or_else(|| {
        BridgeError::MissingNetworkAttachment {
            container: container_id.to_string(),
            network: network.to_string(),
        }
    })?;
    Ok(ResolvedContainer {
        name: identity.name,
        address,
    })
}
