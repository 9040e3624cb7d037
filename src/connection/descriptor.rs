//! Parsing of connection descriptors into namespaced redis handles.

use super::namespaced::Namespaced;
use super::types::{ConnectionError, DEFAULT_NAMESPACE, URL_SCHEMES};
use redis::{Client, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

/// The accepted shapes of a connection setting.
#[derive(Debug, Clone)]
pub enum ConnectionDescriptor {
    /// `host:port`, `host:port:db`, optionally followed by `/namespace`.
    Server(String),
    /// A URL starting with one of [`URL_SCHEMES`], handed to the redis client as-is.
    Url(String),
    /// A connection that is already bound to a namespace; stored without re-wrapping.
    Namespaced(Namespaced),
    /// A bare redis client; wrapped with [`DEFAULT_NAMESPACE`].
    Raw(Client),
}

/// Components of a `host:port[:db][/namespace]` descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSpec {
    /// Host name or address.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Database index, when the descriptor selected one.
    pub db: Option<i64>,
    /// Namespace following the first `/`, when present and non-empty.
    pub namespace: Option<String>,
}

impl ConnectionDescriptor {
    /// Turn the descriptor into a namespaced connection.
    ///
    /// No network traffic happens here; the redis client connects lazily.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectionError`] when a string descriptor is malformed or the redis client
    /// rejects the resulting parameters.
    pub fn resolve(self) -> Result<Namespaced, ConnectionError> {
        match self {
            Self::Url(url) => connect_url(&url),
            Self::Server(server) => connect_server(&server),
            Self::Namespaced(connection) => Ok(connection),
            Self::Raw(client) => Ok(Namespaced::new(client, DEFAULT_NAMESPACE)),
        }
    }
}

impl From<&str> for ConnectionDescriptor {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<String> for ConnectionDescriptor {
    fn from(value: String) -> Self {
        if is_url(&value) {
            Self::Url(value)
        } else {
            Self::Server(value)
        }
    }
}

impl From<Namespaced> for ConnectionDescriptor {
    fn from(value: Namespaced) -> Self {
        Self::Namespaced(value)
    }
}

impl From<Client> for ConnectionDescriptor {
    fn from(value: Client) -> Self {
        Self::Raw(value)
    }
}

/// Whether `descriptor` starts with a URL scheme understood by the redis client.
pub fn is_url(descriptor: &str) -> bool {
    let descriptor = descriptor.trim_start();
    URL_SCHEMES
        .iter()
        .any(|scheme| descriptor.starts_with(scheme))
}

/// Split a `host:port[:db][/namespace]` descriptor into its components.
///
/// # Errors
///
/// Returns [`ConnectionError`] when the host or port is missing, the port is not a `u16`, or
/// the database segment is not an integer.
pub fn parse_server(descriptor: &str) -> Result<ServerSpec, ConnectionError> {
    let descriptor = descriptor.trim();
    let (server, namespace) = match descriptor.split_once('/') {
        Some((server, namespace)) => (server, Some(namespace)),
        None => (descriptor, None),
    };

    let mut segments = server.split(':').map(str::trim);
    let host = segments
        .next()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| ConnectionError::MissingHost(descriptor.to_string()))?;
    let port = segments
        .next()
        .filter(|port| !port.is_empty())
        .ok_or_else(|| ConnectionError::MissingPort(descriptor.to_string()))?;
    let port = port.parse::<u16>().map_err(|_| ConnectionError::InvalidPort {
        port: port.to_string(),
    })?;
    let db = segments
        .next()
        .filter(|db| !db.is_empty())
        .map(|db| {
            db.parse::<i64>()
                .ok()
                .filter(|index| *index >= 0)
                .ok_or_else(|| ConnectionError::InvalidDatabase { db: db.to_string() })
        })
        .transpose()?;

    let ignored: Vec<&str> = segments.collect();
    if !ignored.is_empty() {
        tracing::warn!(?ignored, "Ignoring extra segments in connection descriptor");
    }

    Ok(ServerSpec {
        host: host.to_string(),
        port,
        db,
        namespace: namespace
            .map(str::trim)
            .filter(|namespace| !namespace.is_empty())
            .map(str::to_string),
    })
}

fn connect_url(url: &str) -> Result<Namespaced, ConnectionError> {
    let client = Client::open(url.trim())?;
    tracing::debug!(namespace = DEFAULT_NAMESPACE, "Built redis client from URL");
    Ok(Namespaced::new(client, DEFAULT_NAMESPACE))
}

fn connect_server(descriptor: &str) -> Result<Namespaced, ConnectionError> {
    let spec = parse_server(descriptor)?;
    let namespace = spec
        .namespace
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

    let info = ConnectionInfo {
        addr: ConnectionAddr::Tcp(spec.host, spec.port),
        redis: RedisConnectionInfo {
            db: spec.db.unwrap_or_default(),
            ..Default::default()
        },
    };
    let client = Client::open(info)?;
    tracing::debug!(
        namespace = %namespace,
        db = ?spec.db,
        "Built redis client from host/port descriptor"
    );

    Ok(Namespaced::new(client, namespace))
}
