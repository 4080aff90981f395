//! Shared types for the dkron agent
//!
//! This crate contains the typed error surface shared across the dkron
//! agent components.

pub mod error;

pub use error::{ConfigError, Result};
