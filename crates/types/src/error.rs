//! Error types for the dkron agent

use thiserror::Error;

/// Configuration resolution errors
///
/// Host identity failure is deliberately absent: a node that cannot learn
/// its own hostname must not start at all, so that condition panics instead
/// of being returned.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Address is not a valid host[:port] form or does not resolve
    #[error("invalid address {address}: {reason}")]
    AddressMalformed { address: String, reason: String },

    /// A named network interface does not exist on this host
    #[error("no such network interface: {name}")]
    InterfaceNotFound { name: String },

    /// The OS interface enumerator itself failed
    #[error("failed to enumerate network interfaces: {0}")]
    InterfaceEnumeration(#[source] std::io::Error),

    /// The configured encryption key is not valid base64
    #[error("invalid encryption key: {0}")]
    KeyDecodeFailed(#[from] base64::DecodeError),

    /// Configuration file not found
    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
