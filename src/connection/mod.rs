//! Redis connection wiring.

pub mod descriptor;
pub mod namespaced;
pub mod types;

pub use descriptor::{ConnectionDescriptor, ServerSpec, is_url, parse_server};
pub use namespaced::Namespaced;
pub use types::{ConnectionError, DEFAULT_NAMESPACE, URL_SCHEMES};
