//! Namespace-bound wrapper around a redis client.

use redis::{Client, ConnectionAddr};
use std::path::Path;

/// A redis client bound to a key namespace.
///
/// Every key produced through [`Namespaced::key`] is prefixed with `"<namespace>:"`, which keeps
/// several applications sharing one Redis instance from colliding. Cloning is cheap: the
/// underlying [`Client`] only holds connection parameters and opens sockets lazily.
#[derive(Debug, Clone)]
pub struct Namespaced {
    client: Client,
    namespace: String,
}

impl Namespaced {
    /// Wrap `client` so that all keys live under `namespace`.
    pub fn new(client: Client, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
        }
    }

    /// Namespace bound to this connection.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Underlying redis client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Prefix `suffix` with this connection's namespace.
    pub fn key(&self, suffix: &str) -> String {
        format!("{}:{suffix}", self.namespace)
    }

    /// TCP host of the connection, if it is not a Unix socket.
    pub fn host(&self) -> Option<&str> {
        match &self.client.get_connection_info().addr {
            ConnectionAddr::Tcp(host, _) => Some(host.as_str()),
            ConnectionAddr::TcpTls { host, .. } => Some(host.as_str()),
            _ => None,
        }
    }

    /// TCP port of the connection, if it is not a Unix socket.
    pub fn port(&self) -> Option<u16> {
        match &self.client.get_connection_info().addr {
            ConnectionAddr::Tcp(_, port) => Some(*port),
            ConnectionAddr::TcpTls { port, .. } => Some(*port),
            _ => None,
        }
    }

    /// Socket path of the connection, if it goes through a Unix socket.
    pub fn socket_path(&self) -> Option<&Path> {
        match &self.client.get_connection_info().addr {
            #[cfg(unix)]
            ConnectionAddr::Unix(path) => Some(path.as_path()),
            _ => None,
        }
    }

    /// Password sent on connect, if any.
    pub fn password(&self) -> Option<&str> {
        self.client.get_connection_info().redis.password.as_deref()
    }

    /// Selected database index (0 when none was requested).
    pub fn db(&self) -> i64 {
        self.client.get_connection_info().redis.db
    }

    /// Open a connection and issue `PING`, returning the server's reply.
    pub async fn ping(&self) -> Result<String, redis::RedisError> {
        let mut connection = self.client.get_multiplexed_async_connection().await?;
        let reply: String = redis::cmd("PING").query_async(&mut connection).await?;
        tracing::debug!(namespace = %self.namespace, reply = %reply, "Redis ping succeeded");
        Ok(reply)
    }
}
