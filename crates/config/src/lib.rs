//! Configuration resolution for the dkron agent
//!
//! This crate turns raw, loosely typed input (built-in defaults, command-line
//! flags, environment variables and YAML files) into the typed runtime
//! configuration consumed by the networking, cluster membership and
//! notification subsystems.

pub mod flags;
pub mod loader;
pub mod schema;

mod resolve;

pub use flags::*;
pub use loader::ConfigLoader;
pub use schema::*;
