//! mdns-bridge daemon entry point.
//!
//! Watches Docker for containers joining the configured network and
//! publishes their hostnames through an mDNS announcer.

use anyhow::Context;
use log::{error, info};
use tokio::signal;

mod announcer;
mod bridge;
mod config;
mod error;
mod naming;
mod resolver;
mod runtime;
#[cfg(test)]
mod testing;
mod types;

use announcer::CommandAnnouncer;
use bridge::Bridge;
use config::Config;
use runtime::{ContainerRuntime, DockerRuntime};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load configuration
    let cfg = Config::load()?;
    info!("Starting mdns-bridge with config: {:?}", cfg);

    // Without the runtime there is nothing to do.
    let runtime = DockerRuntime::connect()
        .await
        .context("Error creating Docker client")?;

    let announcer = CommandAnnouncer::new(cfg.announcer_command.clone());
    let bridge = Bridge::new(runtime, announcer, &cfg);
    let channels = bridge.runtime().subscribe();

    bridge
        .run(channels, async {
            match signal::ctrl_c().await {
                Ok(()) => info!("Received Ctrl+C, shutting down..."),
                Err(err) => {
                    error!("Unable to listen for shutdown signal: {}", err);
                    std::future::pending::<()>().await;
                }
            }
        })
        .await;

    info!("Shutdown complete.");
    Ok(())
}
