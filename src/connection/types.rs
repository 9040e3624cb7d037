//! Shared types used while wiring Redis connections.

use thiserror::Error;

/// Namespace bound to connections when the descriptor does not name one.
pub const DEFAULT_NAMESPACE: &str = "redcrumbs";

/// URL schemes routed straight to the redis client instead of `host:port` splitting.
pub const URL_SCHEMES: &[&str] = &["redis://", "rediss://", "redis+unix://", "unix://"];

/// Errors returned while turning a descriptor into a namespaced connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Descriptor did not start with a host segment.
    #[error("Missing host in connection descriptor: {0:?}")]
    MissingHost(String),
    /// Descriptor did not include a port segment.
    #[error("Missing port in connection descriptor: {0:?}")]
    MissingPort(String),
    /// Port segment was not a valid TCP port.
    #[error("Invalid port {port:?} in connection descriptor")]
    InvalidPort {
        /// Raw port segment as supplied.
        port: String,
    },
    /// Database segment was not a non-negative integer index.
    #[error("Invalid database index {db:?} in connection descriptor")]
    InvalidDatabase {
        /// Raw database segment as supplied.
        db: String,
    },
    /// The redis client rejected the connection parameters.
    #[error("Redis client error: {0}")]
    Redis(#[from] redis::RedisError),
}
