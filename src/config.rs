use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;
use crate::naming::NamingConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Network whose connect events trigger publishing.
    pub network_name: String,
    pub domain_suffix: String,
    pub container_prefix: String,
    /// Prepended to the canonical hostname to form the alias.
    pub alias_prefix: String,
    /// Announcer program, invoked as `<cmd> cname --fqdn <fqdn> <value>`.
    pub announcer_command: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network_name: "my-routed-network".into(),
            domain_suffix: ".local".into(),
            container_prefix: "container-".into(),
            alias_prefix: "service-".into(),
            announcer_command: "go-avahi-cname".into(),
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("mdns-bridge.toml"))
            .merge(Json::file("mdns-bridge.json"))
            .merge(Env::prefixed("MDNS_BRIDGE_"))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config: Config = Self::figment()
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would make hostname derivation produce empty names.
    pub fn validate(&self) -> Result<(), BridgeError> {
        if self.network_name.trim().is_empty() {
            return Err(BridgeError::Config("network_name must not be empty".into()));
        }
        if self.alias_prefix.is_empty() {
            return Err(BridgeError::Config("alias_prefix must not be empty".into()));
        }
        if self.container_prefix.is_empty() && self.domain_suffix.is_empty() {
            return Err(BridgeError::Config(
                "container_prefix and domain_suffix cannot both be empty".into(),
            ));
        }
        if self.announcer_command.trim().is_empty() {
            return Err(BridgeError::Config(
                "announcer_command must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn naming(&self) -> NamingConfig {
        NamingConfig {
            container_prefix: self.container_prefix.clone(),
            domain_suffix: self.domain_suffix.clone(),
            alias_prefix: self.alias_prefix.clone(),
        }
    }
}
