//! Derivation helpers that turn raw configured strings into typed values
//!
//! These run once during agent bootstrap: the bind/advertise address is
//! normalized with the default membership port, the configured network
//! interface is looked up by name and the gossip encryption key is decoded.

use crate::schema::{Config, DEFAULT_BIND_PORT};
use base64::{engine::general_purpose, Engine as _};
use std::net::{IpAddr, ToSocketAddrs};
use thiserror::Error;
use types::{ConfigError, Result};

#[derive(Debug, Error, PartialEq)]
enum HostPortError {
    #[error("missing port in address")]
    MissingPort,
    #[error("too many colons in address")]
    TooManyColons,
    #[error("missing ']' in address")]
    UnclosedBracket,
    #[error("unexpected character after ']' in address")]
    TrailingGarbage,
    #[error("unexpected '[' or ']' in address")]
    StrayBracket,
}

/// Splits an address into host and port parts following host:port grammar.
/// Bracketed IPv6 hosts lose their brackets, a bare host reports a missing
/// port, and unbracketed multi-colon input is rejected rather than guessed
/// at.
fn split_host_port(addr: &str) -> std::result::Result<(String, String), HostPortError> {
    if let Some(rest) = addr.strip_prefix('[') {
        let end = rest.find(']').ok_or(HostPortError::UnclosedBracket)?;
        let host = &rest[..end];
        let after = &rest[end + 1..];
        return match after.strip_prefix(':') {
            Some(port) if !port.contains(':') => Ok((host.to_string(), port.to_string())),
            Some(_) => Err(HostPortError::TooManyColons),
            None if after.is_empty() => Err(HostPortError::MissingPort),
            None => Err(HostPortError::TrailingGarbage),
        };
    }

    if addr.contains('[') || addr.contains(']') {
        return Err(HostPortError::StrayBracket);
    }

    let mut parts = addr.splitn(2, ':');
    let host = parts.next().unwrap_or_default();
    match parts.next() {
        None => Err(HostPortError::MissingPort),
        Some(port) if port.contains(':') => Err(HostPortError::TooManyColons),
        Some(port) => Ok((host.to_string(), port.to_string())),
    }
}

fn malformed(address: &str, reason: impl ToString) -> ConfigError {
    ConfigError::AddressMalformed {
        address: address.to_string(),
        reason: reason.to_string(),
    }
}

impl Config {
    /// Normalizes an address into its host and port parts, inserting
    /// [`DEFAULT_BIND_PORT`] when the port is omitted. Hostnames are resolved
    /// to a concrete address as part of this step; every other malformation
    /// is reported, never defaulted.
    pub fn addr_parts(&self, address: &str) -> Result<(String, u16)> {
        // A missing port is the single recoverable failure: rewrite the
        // input once with the default port and split again. Anything else
        // propagates immediately.
        let (host, port) = match split_host_port(address) {
            Ok(parts) => parts,
            Err(HostPortError::MissingPort) => {
                let corrected = format!("{address}:{DEFAULT_BIND_PORT}");
                split_host_port(&corrected).map_err(|e| malformed(address, e))?
            }
            Err(e) => return Err(malformed(address, e)),
        };

        let port: u16 = port
            .parse()
            .map_err(|_| malformed(address, format!("invalid port {port:?}")))?;

        // An empty host means the wildcard address.
        let host = if host.is_empty() { "0.0.0.0" } else { host.as_str() };
        let ip: IpAddr = match host.parse() {
            Ok(ip) => ip,
            Err(_) => (host, port)
                .to_socket_addrs()
                .map_err(|e| malformed(address, e))?
                .next()
                .map(|addr| addr.ip())
                .ok_or_else(|| malformed(address, "hostname resolved to no addresses"))?,
        };

        Ok((ip.to_string(), port))
    }

    /// Looks up the configured network interface. An empty name is the valid
    /// "use the platform default" outcome, not an error.
    pub fn network_interface(&self) -> Result<Option<if_addrs::Interface>> {
        if self.interface.is_empty() {
            return Ok(None);
        }

        let interfaces = if_addrs::get_if_addrs().map_err(ConfigError::InterfaceEnumeration)?;
        interfaces
            .into_iter()
            .find(|iface| iface.name == self.interface)
            .map(Some)
            .ok_or_else(|| ConfigError::InterfaceNotFound {
                name: self.interface.clone(),
            })
    }

    /// Decodes the configured encryption key from standard base64. An empty
    /// key decodes to an empty byte sequence; callers check the length to
    /// tell "no encryption configured" apart from a failure.
    pub fn encrypt_bytes(&self) -> Result<Vec<u8>> {
        Ok(general_purpose::STANDARD.decode(&self.encrypt_key)?)
    }
}
