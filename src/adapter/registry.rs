//! Registry of persistence adapters keyed by identifier.

use super::naming::{NamingConvention, namespaced_naming_convention, plain_naming_convention};
use crate::connection::Namespaced;
use serde::Serialize;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use thiserror::Error;

/// Identifier under which the crumb store adapter is registered.
pub const ADAPTER_IDENTIFIER: &str = "default";
/// Adapter kind recorded in the registered options.
pub const ADAPTER_KIND: &str = "redis";

/// Errors raised while registering an adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Adapter identifiers must be non-empty.
    #[error("Adapter identifier must not be empty")]
    EmptyIdentifier,
    /// The connection exposes neither a TCP host/port nor a socket path.
    #[error("Connection in namespace {namespace:?} has no address to register")]
    UnsupportedAddress {
        /// Namespace of the rejected connection.
        namespace: String,
    },
}

/// Connection options handed to an adapter on setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterOptions {
    /// Adapter kind, always [`ADAPTER_KIND`] for crumbs.
    pub adapter: String,
    /// Store host, or the socket path for Unix socket connections.
    pub host: String,
    /// Store port; `None` for Unix socket connections.
    pub port: Option<u16>,
    /// Credential sent on connect.
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Database index.
    pub db: i64,
}

impl AdapterOptions {
    /// Derive adapter options from a namespaced connection.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::UnsupportedAddress`] for connections with neither a TCP
    /// host/port nor a socket path.
    pub fn from_connection(connection: &Namespaced) -> Result<Self, AdapterError> {
        let (host, port) = match (connection.host(), connection.port()) {
            (Some(host), Some(port)) => (host.to_string(), Some(port)),
            _ => match connection.socket_path() {
                Some(path) => (path.display().to_string(), None),
                None => {
                    return Err(AdapterError::UnsupportedAddress {
                        namespace: connection.namespace().to_string(),
                    });
                }
            },
        };

        Ok(Self {
            adapter: ADAPTER_KIND.to_string(),
            host,
            port,
            password: connection.password().map(str::to_string),
            db: connection.db(),
        })
    }
}

/// A registered adapter: its options plus the resource naming convention in force.
#[derive(Clone)]
pub struct Adapter {
    identifier: String,
    options: AdapterOptions,
    naming_convention: NamingConvention,
}

impl Adapter {
    /// Identifier the adapter was registered under.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Options supplied at setup.
    pub fn options(&self) -> &AdapterOptions {
        &self.options
    }

    /// Replace the resource naming convention.
    pub fn set_naming_convention(&mut self, convention: NamingConvention) {
        self.naming_convention = convention;
    }

    /// Storage name for a logical resource name under the current convention.
    pub fn resource_name(&self, logical_name: &str) -> String {
        (self.naming_convention)(logical_name)
    }
}

impl fmt::Debug for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("identifier", &self.identifier)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Persistence adapters known to the process.
#[derive(Debug, Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Adapter>,
}

impl AdapterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an adapter under `identifier` with the plain naming convention.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::EmptyIdentifier`] when `identifier` is blank.
    pub fn setup(
        &mut self,
        identifier: &str,
        options: AdapterOptions,
    ) -> Result<&mut Adapter, AdapterError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AdapterError::EmptyIdentifier);
        }

        tracing::debug!(
            identifier,
            adapter = %options.adapter,
            host = %options.host,
            port = ?options.port,
            db = options.db,
            has_password = options.password.is_some(),
            "Registering persistence adapter"
        );

        let adapter = Adapter {
            identifier: identifier.to_string(),
            options,
            naming_convention: plain_naming_convention(),
        };
        Ok(match self.adapters.entry(identifier.to_string()) {
            Entry::Occupied(mut slot) => {
                slot.insert(adapter);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(adapter),
        })
    }

    /// Look up a registered adapter.
    pub fn get(&self, identifier: &str) -> Option<&Adapter> {
        self.adapters.get(identifier)
    }

    /// Number of registered adapters.
    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    /// Whether no adapter has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// Register `connection` as the crumb store adapter and install its namespaced naming
/// convention.
///
/// # Errors
///
/// Propagates [`AdapterError`] when the connection cannot be described as adapter options.
pub fn register<'a>(
    registry: &'a mut AdapterRegistry,
    connection: &Namespaced,
) -> Result<&'a Adapter, AdapterError> {
    let options = AdapterOptions::from_connection(connection)?;
    let adapter = registry.setup(ADAPTER_IDENTIFIER, options)?;
    adapter.set_naming_convention(namespaced_naming_convention(connection.namespace()));
    Ok(adapter)
}
