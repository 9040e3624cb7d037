#![deny(missing_docs)]

//! Configuration and store wiring for redcrumbs activity tracking.

/// Persistence adapter registration and resource naming.
pub mod adapter;
/// Settings registry and environment-driven configuration.
pub mod config;
/// Redis connection descriptors and namespaced handles.
pub mod connection;
/// Record class registry and crumb class resolution.
pub mod crumb_class;
/// Stdout and file log routing for binaries.
pub mod logging;

pub use config::{
    Config, ConfigError, configure, get_config, get_config_mut, init_config,
    init_config_with_connection,
};
pub use connection::{ConnectionDescriptor, Namespaced};
