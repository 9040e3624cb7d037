//! Persistence adapter registration.

pub mod naming;
pub mod registry;

pub use naming::{NamingConvention, namespaced_naming_convention, storage_name};
pub use registry::{
    ADAPTER_IDENTIFIER, ADAPTER_KIND, Adapter, AdapterError, AdapterOptions, AdapterRegistry,
    register,
};
