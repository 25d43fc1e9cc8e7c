//! Hostname derivation.

use crate::types::PublishRequest;

/// String constants that shape derived hostnames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConfig {
    pub container_prefix: String,
    pub domain_suffix: String,
    pub alias_prefix: String,
}

/// Canonical and alias hostnames for one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostnameSet {
    pub canonical: String,
    pub alias: String,
}

impl HostnameSet {
    pub fn derive(container_name: &str, naming: &NamingConfig) -> Self {
        let canonical = format!(
            "{}{}{}",
            naming.container_prefix, container_name, naming.domain_suffix
        );
        let alias = format!("{}{}", naming.alias_prefix, canonical);
        Self { canonical, alias }
    }

    /// Canonical record (name -> address) followed by the alias record.
    ///
    /// Both records are published with the canonical name as `--fqdn`.
    pub fn publish_requests(&self, address: &str) -> [PublishRequest; 2] {
        [
            PublishRequest::new(&self.canonical, address),
            PublishRequest::new(&self.canonical, &self.alias),
        ]
    }
}
