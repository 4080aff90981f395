//! Configuration loader implementation
//!
//! Thin in-repo face of the merge pipeline: built-in defaults are overlaid
//! with an optional YAML file and `DKRON_`-prefixed environment variables.
//! Merging parsed command-line flags on top belongs to the agent binary.

use crate::schema::Config;
use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use std::path::Path;
use tracing::{debug, info};
use types::ConfigError;

/// Configuration loader that layers files and environment variables over the
/// built-in defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration, optionally merging a YAML file on top of the
    /// defaults. `None` skips the file layer entirely; an explicit path that
    /// does not exist is an error.
    pub fn load<P: AsRef<Path>>(config_path: Option<P>) -> Result<Config> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        if let Some(path) = config_path {
            let path = path.as_ref();
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                }
                .into());
            }
            info!(path = %path.display(), "merging configuration file");
            figment = figment.merge(Yaml::file(path));
        }

        let config: Config = figment
            .merge(Env::prefixed("DKRON_"))
            .extract()
            .context("failed to parse configuration")?;

        debug!(node_name = %config.node_name, "configuration resolved");
        Ok(config)
    }

    /// Load configuration from a YAML string (for testing).
    pub fn load_from_str(yaml: &str) -> Result<Config> {
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::string(yaml))
            .extract()
            .context("failed to parse configuration from string")?;

        Ok(config)
    }

    /// Write the default configuration as an example YAML file.
    pub fn write_example<P: AsRef<Path>>(path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(&Config::default())
            .context("failed to serialize default configuration")?;

        std::fs::write(path.as_ref(), yaml)
            .context("failed to write example configuration file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::VERSION;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_without_file_yields_defaults() {
        let config = ConfigLoader::load(None::<&Path>).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8946");
        assert_eq!(config.backend, "etcd");
        assert_eq!(config.rpc_port, 6868);
    }

    #[test]
    fn test_load_from_str_overlays_defaults() {
        let yaml = r#"
bind_addr: "10.0.0.5:7946"
backend_machines:
  - "10.0.0.1:2379"
  - "10.0.0.2:2379"
reconnect_interval: "30s"
tags:
  dc: east
server: true
"#;

        let config = ConfigLoader::load_from_str(yaml).unwrap();
        assert_eq!(config.bind_addr, "10.0.0.5:7946");
        assert_eq!(config.backend_machines, vec!["10.0.0.1:2379", "10.0.0.2:2379"]);
        assert_eq!(config.reconnect_interval, Duration::from_secs(30));
        assert!(config.server);

        // Untouched fields keep their defaults; tag maps merge by key.
        assert_eq!(config.keyspace, "dkron");
        assert_eq!(config.tags["dc"], "east");
        assert_eq!(config.tags["dkron_version"], VERSION);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = ConfigLoader::load(Some("/definitely/not/here/dkron.yml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_write_example_round_trips() {
        let file = NamedTempFile::new().unwrap();
        ConfigLoader::write_example(file.path()).unwrap();

        let config = ConfigLoader::load(Some(file.path())).unwrap();
        assert_eq!(config.rpc_port, 6868);
        assert_eq!(config.mail_subject_prefix, "[Dkron]");
    }
}
