//! Configuration schema and defaults

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default port used for cluster membership communication.
pub const DEFAULT_BIND_PORT: u16 = 8946;

/// Version string baked in at build time, advertised to the cluster through
/// the `dkron_version` tag.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runtime configuration for a dkron agent.
///
/// One value is built from defaults at process start, overlaid by the merge
/// pipeline (file, environment, command-line flags) and then shared read-only
/// with every subsystem. It must be treated as immutable once the merge has
/// finished; no in-place mutation happens past that point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Node name, defaults to the local hostname
    pub node_name: String,
    /// Address to bind membership listeners to
    pub bind_addr: String,
    /// HTTP API address
    pub http_addr: String,
    /// mDNS discovery name
    pub discover: String,
    /// Coordination/storage backend identifier
    pub backend: String,
    /// Backend endpoint addresses, order preserved
    pub backend_machines: Vec<String>,
    /// Gossip timing profile (lan, wan, local)
    pub profile: String,
    /// Network interface to bind to, empty means platform default
    pub interface: String,
    /// Address announced to peers when it differs from the bind address
    pub advertise_addr: String,
    /// Node tags; the `dkron_version` key is always present by default
    pub tags: HashMap<String, String>,
    /// Path used for membership snapshots
    pub snapshot_path: String,
    /// Interval between reconnection attempts to failed nodes
    #[serde(with = "humantime_serde")]
    pub reconnect_interval: Duration,
    /// Time after which a failed node is given up on
    #[serde(with = "humantime_serde")]
    pub reconnect_timeout: Duration,
    /// Retention of membership records for departed nodes
    #[serde(with = "humantime_serde")]
    pub tombstone_timeout: Duration,
    /// Disable resolving node name conflicts via DNS
    pub disable_name_resolution: bool,
    /// Keyring file path
    pub keyring_file: String,
    /// Rejoin the cluster ignoring a previous leave
    pub rejoin_after_leave: bool,
    /// Run this agent as a server
    pub server: bool,
    /// Base64-encoded gossip encryption key, decoded on demand
    pub encrypt_key: String,
    /// Peer addresses to join at startup
    pub start_join: Vec<String>,
    /// Key namespace inside the backend
    pub keyspace: String,
    /// RPC listen port
    pub rpc_port: u16,
    /// Advertised RPC port; 0 means unset, the fallback to `rpc_port` is
    /// resolved by the RPC subsystem, not here
    pub advertise_rpc_port: u16,
    /// Log verbosity level
    pub log_level: String,

    /// Notification mail server host
    pub mail_host: String,
    /// Notification mail server port
    pub mail_port: u16,
    pub mail_username: String,
    pub mail_password: String,
    /// Notification emails from address
    pub mail_from: String,
    /// Notification mail body template
    pub mail_payload: String,
    /// Notification mail subject prefix
    pub mail_subject_prefix: String,

    /// Notification webhook url
    pub webhook_url: String,
    /// Notification webhook body template
    pub webhook_payload: String,
    /// Raw header lines sent with webhook notifications, order preserved
    pub webhook_headers: Vec<String>,

    /// Address of a dogstatsd instance; metrics are sent there when set
    pub dog_statsd_addr: String,
    /// Global tags sent with each dogstatsd packet, as "name:value" strings
    pub dog_statsd_tags: Vec<String>,
    /// Plain statsd address
    pub statsd_addr: String,
}

impl Default for Config {
    /// Builds the canonical default configuration. Every call returns freshly
    /// allocated values, so mutating one default object never leaks into
    /// another.
    ///
    /// # Panics
    ///
    /// Panics when the local hostname cannot be determined. Every other
    /// subsystem depends on a non-empty node identity, so starting without
    /// one is not recoverable.
    fn default() -> Self {
        let mut tags = HashMap::new();
        tags.insert("dkron_version".to_string(), VERSION.to_string());

        Self {
            node_name: default_node_name(),
            bind_addr: format!("0.0.0.0:{DEFAULT_BIND_PORT}"),
            http_addr: ":8080".to_string(),
            discover: "dkron".to_string(),
            backend: "etcd".to_string(),
            backend_machines: vec!["127.0.0.1:2379".to_string()],
            profile: "lan".to_string(),
            interface: String::new(),
            advertise_addr: String::new(),
            tags,
            snapshot_path: String::new(),
            reconnect_interval: Duration::ZERO,
            reconnect_timeout: Duration::ZERO,
            tombstone_timeout: Duration::ZERO,
            disable_name_resolution: false,
            keyring_file: String::new(),
            rejoin_after_leave: false,
            server: false,
            encrypt_key: String::new(),
            start_join: Vec::new(),
            keyspace: "dkron".to_string(),
            rpc_port: 6868,
            advertise_rpc_port: 0,
            log_level: "info".to_string(),
            mail_host: String::new(),
            mail_port: 0,
            mail_username: String::new(),
            mail_password: String::new(),
            mail_from: String::new(),
            mail_payload: String::new(),
            mail_subject_prefix: "[Dkron]".to_string(),
            webhook_url: String::new(),
            webhook_payload: String::new(),
            webhook_headers: Vec::new(),
            dog_statsd_addr: String::new(),
            dog_statsd_tags: Vec::new(),
            statsd_addr: String::new(),
        }
    }
}

/// Local hostname, the fallback node identity.
fn default_node_name() -> String {
    hostname::get()
        .expect("failed to determine local hostname")
        .into_string()
        .expect("local hostname is not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let c = Config::default();
        assert!(!c.node_name.is_empty());
        assert_eq!(c.bind_addr, "0.0.0.0:8946");
        assert_eq!(c.http_addr, ":8080");
        assert_eq!(c.discover, "dkron");
        assert_eq!(c.backend, "etcd");
        assert_eq!(c.backend_machines, vec!["127.0.0.1:2379"]);
        assert_eq!(c.profile, "lan");
        assert_eq!(c.keyspace, "dkron");
        assert_eq!(c.log_level, "info");
        assert_eq!(c.rpc_port, 6868);
        assert_eq!(c.advertise_rpc_port, 0);
        assert_eq!(c.mail_subject_prefix, "[Dkron]");
        assert_eq!(c.reconnect_interval, Duration::ZERO);
        assert!(c.advertise_addr.is_empty());
        assert!(c.start_join.is_empty());
        assert!(!c.server);
    }

    #[test]
    fn test_default_tags_do_not_alias() {
        let mut first = Config::default();
        let second = Config::default();

        assert_eq!(first.tags.len(), 1);
        assert_eq!(first.tags["dkron_version"], VERSION);

        first.tags.insert("dc".to_string(), "east".to_string());
        assert_eq!(second.tags.len(), 1);
        assert!(!second.tags.contains_key("dc"));
    }
}
