use crate::adapter::{self, ADAPTER_IDENTIFIER, AdapterError, AdapterOptions, AdapterRegistry};
use crate::adapter::naming::camelize;
use crate::connection::{ConnectionDescriptor, ConnectionError, Namespaced};
use crate::crumb_class::{BASE_CRUMB_CLASS, ClassError, ClassRegistry, Lookup, RecordClass};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::Serialize;
use std::collections::BTreeSet;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use time::OffsetDateTime;

const ENV_CREATOR_CLASS: &str = "REDCRUMBS_CREATOR_CLASS";
const ENV_CREATOR_PRIMARY_KEY: &str = "REDCRUMBS_CREATOR_PRIMARY_KEY";
const ENV_TARGET_CLASS: &str = "REDCRUMBS_TARGET_CLASS";
const ENV_TARGET_PRIMARY_KEY: &str = "REDCRUMBS_TARGET_PRIMARY_KEY";
const ENV_STORE_CREATOR_ATTRIBUTES: &str = "REDCRUMBS_STORE_CREATOR_ATTRIBUTES";
const ENV_STORE_TARGET_ATTRIBUTES: &str = "REDCRUMBS_STORE_TARGET_ATTRIBUTES";
const ENV_MORTALITY_SECS: &str = "REDCRUMBS_MORTALITY_SECS";
const ENV_CRUMB_CLASS: &str = "REDCRUMBS_CRUMB_CLASS";
const ENV_CONNECTION: &str = "REDCRUMBS_CONNECTION";

/// Identity used for both creator and target until configured otherwise.
pub const DEFAULT_CLASS_SYM: &str = "user";
/// Primary key used for both creator and target until configured otherwise.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Errors raised while configuring redcrumbs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A setting or environment variable held an unusable value.
    #[error("Invalid value for {0}")]
    InvalidValue(String),
    /// The connection descriptor could not be turned into a connection.
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    /// Registering the connection with the persistence adapter failed.
    #[error("Adapter registration failed: {0}")]
    Adapter(#[from] AdapterError),
    /// The record class registry rejected a registration.
    #[error("Record class registration failed: {0}")]
    Class(#[from] ClassError),
    /// The configured crumb class name is not a well-formed class path.
    #[error("Invalid record class name: {0:?}")]
    InvalidClassName(String),
    /// The configured crumb class exists but does not descend from the base record class.
    #[error("invalid record class {0}: must inherit from Redcrumbs::Crumb")]
    InvalidCrumbClass(String),
    /// A connection was required but none has been assigned.
    #[error("No crumb store connection configured")]
    NotConnected,
}

/// Settings registry for crumb tracking.
///
/// Holds who creates and who is targeted by crumbs, which of their attributes are snapshotted,
/// how long crumbs live, the store connection and the record class used for new crumbs.
/// Components take a `&Config`; [`get_config`] exposes the process-wide instance.
#[derive(Debug, Clone)]
pub struct Config {
    creator_class_sym: String,
    creator_primary_key: String,
    target_class_sym: String,
    target_primary_key: String,
    store_creator_attributes: BTreeSet<String>,
    store_target_attributes: BTreeSet<String>,
    mortality: Option<Duration>,
    connection: Option<Namespaced>,
    crumb_class_name: Option<String>,
    adapters: AdapterRegistry,
    classes: ClassRegistry,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            creator_class_sym: DEFAULT_CLASS_SYM.to_string(),
            creator_primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            target_class_sym: DEFAULT_CLASS_SYM.to_string(),
            target_primary_key: DEFAULT_PRIMARY_KEY.to_string(),
            store_creator_attributes: BTreeSet::new(),
            store_target_attributes: BTreeSet::new(),
            mortality: None,
            connection: None,
            crumb_class_name: None,
            adapters: AdapterRegistry::new(),
            classes: ClassRegistry::new(),
        }
    }
}

impl Config {
    /// Build a configuration from `REDCRUMBS_*` environment variables.
    ///
    /// Unset or blank variables keep their defaults. When `REDCRUMBS_CONNECTION` is present the
    /// connection is wired exactly as [`Config::set_connection`] would.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending variable, or any error
    /// raised while wiring the connection.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_connection(None)
    }

    /// Like [`Config::from_env`], but wire `connection` instead of `REDCRUMBS_CONNECTION` when
    /// one is given. The environment descriptor is then not parsed at all.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_env_with_connection(connection: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = load_env_optional(ENV_CREATOR_CLASS) {
            config.set_creator_class_sym(value)?;
        }
        if let Some(value) = load_env_optional(ENV_CREATOR_PRIMARY_KEY) {
            config.set_creator_primary_key(value)?;
        }
        if let Some(value) = load_env_optional(ENV_TARGET_CLASS) {
            config.set_target_class_sym(value)?;
        }
        if let Some(value) = load_env_optional(ENV_TARGET_PRIMARY_KEY) {
            config.set_target_primary_key(value)?;
        }
        if let Some(value) = load_env_optional(ENV_STORE_CREATOR_ATTRIBUTES) {
            config.set_store_creator_attributes(split_list(&value));
        }
        if let Some(value) = load_env_optional(ENV_STORE_TARGET_ATTRIBUTES) {
            config.set_store_target_attributes(split_list(&value));
        }
        config.mortality = load_env_optional(ENV_MORTALITY_SECS)
            .map(|value| {
                value
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::InvalidValue(ENV_MORTALITY_SECS.to_string()))
            })
            .transpose()?;
        config.crumb_class_name = load_env_optional(ENV_CRUMB_CLASS);
        let descriptor = match connection {
            Some(descriptor) => Some(descriptor.to_string()),
            None => load_env_optional(ENV_CONNECTION),
        };
        if let Some(descriptor) = descriptor {
            config.set_connection(descriptor)?;
        }

        Ok(config)
    }

    /// Symbol naming the creator class, e.g. `"user"`.
    pub fn creator_class_sym(&self) -> &str {
        &self.creator_class_sym
    }

    /// Set the creator class symbol.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for blank values.
    pub fn set_creator_class_sym(&mut self, value: impl Into<String>) -> Result<(), ConfigError> {
        self.creator_class_sym = non_blank("creator_class_sym", value)?;
        Ok(())
    }

    /// Primary key field of the creator class.
    pub fn creator_primary_key(&self) -> &str {
        &self.creator_primary_key
    }

    /// Set the creator primary key field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for blank values.
    pub fn set_creator_primary_key(&mut self, value: impl Into<String>) -> Result<(), ConfigError> {
        self.creator_primary_key = non_blank("creator_primary_key", value)?;
        Ok(())
    }

    /// Symbol naming the target class.
    pub fn target_class_sym(&self) -> &str {
        &self.target_class_sym
    }

    /// Set the target class symbol.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for blank values.
    pub fn set_target_class_sym(&mut self, value: impl Into<String>) -> Result<(), ConfigError> {
        self.target_class_sym = non_blank("target_class_sym", value)?;
        Ok(())
    }

    /// Primary key field of the target class.
    pub fn target_primary_key(&self) -> &str {
        &self.target_primary_key
    }

    /// Set the target primary key field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for blank values.
    pub fn set_target_primary_key(&mut self, value: impl Into<String>) -> Result<(), ConfigError> {
        self.target_primary_key = non_blank("target_primary_key", value)?;
        Ok(())
    }

    /// Class name derived from the creator symbol (`"admin_user"` becomes `"AdminUser"`).
    pub fn creator_class_name(&self) -> String {
        camelize(&self.creator_class_sym)
    }

    /// Class name derived from the target symbol.
    pub fn target_class_name(&self) -> String {
        camelize(&self.target_class_sym)
    }

    /// Creator attributes snapshotted when a crumb is created.
    pub fn store_creator_attributes(&self) -> &BTreeSet<String> {
        &self.store_creator_attributes
    }

    /// Replace the set of creator attributes to snapshot.
    pub fn set_store_creator_attributes<I, S>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store_creator_attributes = attributes.into_iter().map(Into::into).collect();
    }

    /// Target attributes snapshotted when a crumb is created.
    pub fn store_target_attributes(&self) -> &BTreeSet<String> {
        &self.store_target_attributes
    }

    /// Replace the set of target attributes to snapshot.
    pub fn set_store_target_attributes<I, S>(&mut self, attributes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.store_target_attributes = attributes.into_iter().map(Into::into).collect();
    }

    /// Time-to-live of crumbs; `None` keeps them forever.
    pub fn mortality(&self) -> Option<Duration> {
        self.mortality
    }

    /// Set or clear the crumb time-to-live.
    pub fn set_mortality(&mut self, mortality: Option<Duration>) {
        self.mortality = mortality;
    }

    /// Mortality in whole seconds, as used for store-side expiry.
    pub fn mortality_secs(&self) -> Option<u64> {
        self.mortality.map(|mortality| mortality.as_secs())
    }

    /// When a crumb created at `created_at` expires, if crumbs are mortal.
    pub fn expires_at(&self, created_at: OffsetDateTime) -> Option<OffsetDateTime> {
        let mortality = time::Duration::try_from(self.mortality?).ok()?;
        created_at.checked_add(mortality)
    }

    /// The active store connection.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConnected`] before a connection has been assigned.
    pub fn connection(&self) -> Result<&Namespaced, ConfigError> {
        self.connection.as_ref().ok_or(ConfigError::NotConnected)
    }

    /// Whether a connection has been assigned.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Assign the store connection and register it with the persistence adapter.
    ///
    /// Strings are split into host, port, database and namespace, or handed to the redis
    /// client when they carry a URL scheme; clients are wrapped in the default namespace;
    /// already namespaced connections are stored as they are. The connection is only stored
    /// once adapter registration succeeds, so on error both keep their previous values.
    ///
    /// # Errors
    ///
    /// Propagates [`ConnectionError`] for malformed descriptors and [`AdapterError`] when the
    /// adapter cannot be registered.
    pub fn set_connection(
        &mut self,
        descriptor: impl Into<ConnectionDescriptor>,
    ) -> Result<&Namespaced, ConfigError> {
        let connection = descriptor.into().resolve()?;
        tracing::debug!(
            namespace = %connection.namespace(),
            host = ?connection.host(),
            port = ?connection.port(),
            db = connection.db(),
            "Assigned crumb store connection"
        );

        let mut adapters = self.adapters.clone();
        adapter::register(&mut adapters, &connection)?;
        self.adapters = adapters;
        Ok(&*self.connection.insert(connection))
    }

    /// Persistence adapters registered so far.
    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    /// Storage name of a logical resource under the crumb store adapter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConnected`] when no adapter has been registered.
    pub fn storage_key(&self, logical_name: &str) -> Result<String, ConfigError> {
        self.adapters
            .get(ADAPTER_IDENTIFIER)
            .map(|adapter| adapter.resource_name(logical_name))
            .ok_or(ConfigError::NotConnected)
    }

    /// Name of the record class used for new crumbs, if overridden.
    pub fn crumb_class_name(&self) -> Option<&str> {
        self.crumb_class_name.as_deref()
    }

    /// Override (or reset with `None`) the record class used for new crumbs.
    ///
    /// The name is only checked when [`Config::crumb_class`] resolves it.
    pub fn set_crumb_class_name(&mut self, name: Option<String>) {
        self.crumb_class_name = name;
    }

    /// Known record classes.
    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Mutable access to the record class registry.
    pub fn classes_mut(&mut self) -> &mut ClassRegistry {
        &mut self.classes
    }

    /// Register `name` as a direct subclass of the base crumb class.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Class`] when the registry rejects the name.
    pub fn register_crumb_class(&mut self, name: &str) -> Result<(), ConfigError> {
        self.classes.register(name, Some(BASE_CRUMB_CLASS))?;
        Ok(())
    }

    /// Resolve the record class used for new crumbs.
    ///
    /// Falls back to the base class when no override is set or the override is not
    /// registered.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidClassName`] for malformed names and
    /// [`ConfigError::InvalidCrumbClass`] when the class does not descend from the base class.
    pub fn crumb_class(&self) -> Result<&RecordClass, ConfigError> {
        let Some(name) = self
            .crumb_class_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
        else {
            return Ok(self.classes.base());
        };

        match self.classes.lookup(name) {
            Ok(Lookup::Found(class)) if self.classes.is_crumb_class(class) => Ok(class),
            Ok(Lookup::Found(class)) => Err(ConfigError::InvalidCrumbClass(class.name().to_string())),
            Ok(Lookup::Missing) => {
                tracing::debug!(class = name, "Crumb class not registered; using base class");
                Ok(self.classes.base())
            }
            Err(_) => Err(ConfigError::InvalidClassName(name.to_string())),
        }
    }

    /// Serializable snapshot of the settings, without credentials.
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            creator: RoleSummary {
                class_sym: self.creator_class_sym.clone(),
                class_name: self.creator_class_name(),
                primary_key: self.creator_primary_key.clone(),
                stored_attributes: self.store_creator_attributes.iter().cloned().collect(),
            },
            target: RoleSummary {
                class_sym: self.target_class_sym.clone(),
                class_name: self.target_class_name(),
                primary_key: self.target_primary_key.clone(),
                stored_attributes: self.store_target_attributes.iter().cloned().collect(),
            },
            mortality_secs: self.mortality_secs(),
            namespace: self
                .connection
                .as_ref()
                .map(|connection| connection.namespace().to_string()),
            adapter: self
                .adapters
                .get(ADAPTER_IDENTIFIER)
                .map(|adapter| adapter.options().clone()),
            crumb_class_name: self.crumb_class_name.clone(),
        }
    }
}

/// Serializable view of one event role.
#[derive(Debug, Clone, Serialize)]
pub struct RoleSummary {
    /// Configured class symbol.
    pub class_sym: String,
    /// Class name derived from the symbol.
    pub class_name: String,
    /// Primary key field.
    pub primary_key: String,
    /// Attributes snapshotted on crumb creation.
    pub stored_attributes: Vec<String>,
}

/// Serializable view of a [`Config`].
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    /// Creator role settings.
    pub creator: RoleSummary,
    /// Target role settings.
    pub target: RoleSummary,
    /// Mortality in seconds.
    pub mortality_secs: Option<u64>,
    /// Namespace of the active connection.
    pub namespace: Option<String>,
    /// Options registered with the crumb store adapter.
    pub adapter: Option<AdapterOptions>,
    /// Configured record class override.
    pub crumb_class_name: Option<String>,
}

fn non_blank(field: &str, value: impl Into<String>) -> Result<String, ConfigError> {
    let value = value.into();
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue(field.to_string()));
    }
    Ok(value)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Process-wide configuration, created with defaults on first access.
pub static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

fn global() -> &'static RwLock<Config> {
    CONFIG.get_or_init(|| RwLock::new(Config::default()))
}

/// Read access to the process-wide configuration.
pub fn get_config() -> RwLockReadGuard<'static, Config> {
    global().read()
}

/// Write access to the process-wide configuration.
pub fn get_config_mut() -> RwLockWriteGuard<'static, Config> {
    global().write()
}

/// Apply `setup` to the process-wide configuration.
///
/// The closure works on a copy that replaces the live configuration only when it returns
/// `Ok`, so a failed setup leaves the previous settings in place. No lock is held while
/// `setup` runs, so it may read the live configuration through [`get_config`]. Writes made by
/// other threads in the meantime are overwritten by the swap.
///
/// # Errors
///
/// Returns whatever error `setup` returns.
pub fn configure<F>(setup: F) -> Result<(), ConfigError>
where
    F: FnOnce(&mut Config) -> Result<(), ConfigError>,
{
    let mut draft = get_config().clone();
    setup(&mut draft)?;
    *get_config_mut() = draft;
    Ok(())
}

/// Load configuration from the environment (and `.env`) into the process-wide instance.
///
/// # Errors
///
/// Returns any error raised by [`Config::from_env`]; the previous configuration is kept.
pub fn init_config() -> Result<(), ConfigError> {
    init_config_with_connection(None)
}

/// Load configuration like [`init_config`], with `connection` taking the place of
/// `REDCRUMBS_CONNECTION` when given.
///
/// # Errors
///
/// Returns any error raised by [`Config::from_env_with_connection`].
pub fn init_config_with_connection(connection: Option<&str>) -> Result<(), ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env_with_connection(connection)?;
    tracing::debug!(
        creator = %config.creator_class_sym,
        target = %config.target_class_sym,
        mortality_secs = ?config.mortality_secs(),
        connected = config.is_connected(),
        crumb_class = ?config.crumb_class_name,
        "Loaded configuration"
    );
    *get_config_mut() = config;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::DEFAULT_NAMESPACE;
    use redis::Client;

    #[test]
    fn defaults_use_generic_user_identity() {
        let config = Config::default();
        assert_eq!(config.creator_class_sym(), "user");
        assert_eq!(config.creator_primary_key(), "id");
        assert_eq!(config.target_class_sym(), "user");
        assert_eq!(config.target_primary_key(), "id");
        assert!(config.store_creator_attributes().is_empty());
        assert!(config.store_target_attributes().is_empty());
        assert_eq!(config.mortality(), None);
        assert!(matches!(config.connection(), Err(ConfigError::NotConnected)));
        assert_eq!(config.crumb_class_name(), None);
    }

    #[test]
    fn identity_setters_reject_blank_values() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_creator_class_sym("  "),
            Err(ConfigError::InvalidValue(field)) if field == "creator_class_sym"
        ));
        assert_eq!(config.creator_class_sym(), "user");

        config.set_target_class_sym("admin_user").expect("set");
        config.set_target_primary_key("uuid").expect("set");
        assert_eq!(config.target_class_name(), "AdminUser");
        assert_eq!(config.target_primary_key(), "uuid");
    }

    #[test]
    fn attribute_sets_deduplicate() {
        let mut config = Config::default();
        config.set_store_creator_attributes(["name", "email", "name"]);
        assert_eq!(
            config.store_creator_attributes().iter().collect::<Vec<_>>(),
            vec!["email", "name"]
        );
    }

    #[test]
    fn expiry_follows_mortality() {
        let mut config = Config::default();
        let created = OffsetDateTime::from_unix_timestamp(1_700_000_000).expect("timestamp");
        assert_eq!(config.expires_at(created), None);

        config.set_mortality(Some(Duration::from_secs(3600)));
        assert_eq!(config.mortality_secs(), Some(3600));
        assert_eq!(
            config.expires_at(created).map(OffsetDateTime::unix_timestamp),
            Some(1_700_003_600)
        );
    }

    #[test]
    fn host_port_descriptor_uses_default_namespace() {
        let mut config = Config::default();
        let connection = config.set_connection("localhost:6379").expect("connection");
        assert_eq!(connection.namespace(), DEFAULT_NAMESPACE);
        assert_eq!(connection.db(), 0);
    }

    #[test]
    fn database_segment_is_passed_through() {
        let mut config = Config::default();
        config.set_connection("localhost:6379:7").expect("connection");
        assert_eq!(config.connection().expect("connected").db(), 7);
        assert_eq!(config.adapters().get(ADAPTER_IDENTIFIER).expect("adapter").options().db, 7);
    }

    #[test]
    fn namespace_descriptor_registers_adapter() {
        let mut config = Config::default();
        config.set_connection("localhost:6379/myapp").expect("connection");

        assert_eq!(config.connection().expect("connected").namespace(), "myapp");
        let options = config
            .adapters()
            .get(ADAPTER_IDENTIFIER)
            .expect("adapter")
            .options();
        assert_eq!(options.host, "localhost");
        assert_eq!(options.port, Some(6379));
        assert_eq!(config.storage_key("Crumb").expect("key"), "myapp:crumbs");
    }

    #[test]
    fn url_descriptor_uses_default_namespace() {
        let mut config = Config::default();
        config.set_connection("redis://localhost:6379").expect("connection");
        assert_eq!(
            config.connection().expect("connected").namespace(),
            DEFAULT_NAMESPACE
        );
        assert_eq!(config.storage_key("Crumb").expect("key"), "redcrumbs:crumbs");
    }

    #[test]
    fn namespaced_connection_is_stored_unchanged() {
        let client = Client::open("redis://localhost:6379").expect("client");
        let connection = Namespaced::new(client, "tenant");

        let mut config = Config::default();
        config.set_connection(connection.clone()).expect("first");
        config.set_connection(connection).expect("second");
        let stored = config.connection().expect("connected");
        assert_eq!(stored.namespace(), "tenant");
        assert_eq!(stored.key("crumbs"), "tenant:crumbs");
    }

    #[test]
    fn malformed_descriptor_leaves_connection_unset() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_connection("localhost"),
            Err(ConfigError::Connection(ConnectionError::MissingPort(_)))
        ));
        assert!(!config.is_connected());
        assert!(matches!(config.storage_key("Crumb"), Err(ConfigError::NotConnected)));
    }

    #[test]
    fn reassignment_keeps_adapter_in_step_with_connection() {
        let mut config = Config::default();
        config.set_connection("localhost:6379/first").expect("connection");

        assert!(config.set_connection("localhost:6379:-1/second").is_err());
        assert_eq!(config.connection().expect("connected").namespace(), "first");
        assert_eq!(config.storage_key("Crumb").expect("key"), "first:crumbs");

        #[cfg(unix)]
        {
            config
                .set_connection("redis+unix:///tmp/redis.sock")
                .expect("unix socket");
            let namespace = config.connection().expect("connected").namespace().to_string();
            assert_eq!(namespace, DEFAULT_NAMESPACE);
            assert_eq!(
                config.storage_key("Crumb").expect("key"),
                format!("{namespace}:crumbs")
            );
            let options = config
                .adapters()
                .get(ADAPTER_IDENTIFIER)
                .expect("adapter")
                .options();
            assert_eq!(options.host, "/tmp/redis.sock");
            assert_eq!(options.port, None);
        }
    }

    #[test]
    fn tls_url_registers_adapter() {
        let mut config = Config::default();
        config
            .set_connection("rediss://cache.internal:6380")
            .expect("connection");

        assert_eq!(
            config.connection().expect("connected").namespace(),
            DEFAULT_NAMESPACE
        );
        let options = config
            .adapters()
            .get(ADAPTER_IDENTIFIER)
            .expect("adapter")
            .options();
        assert_eq!(options.host, "cache.internal");
        assert_eq!(options.port, Some(6380));
        assert_eq!(config.storage_key("Crumb").expect("key"), "redcrumbs:crumbs");
    }

    #[test]
    fn crumb_class_falls_back_to_base() {
        let mut config = Config::default();
        assert_eq!(config.crumb_class().expect("class").name(), BASE_CRUMB_CLASS);

        config.set_crumb_class_name(Some(String::new()));
        assert_eq!(config.crumb_class().expect("class").name(), BASE_CRUMB_CLASS);

        config.set_crumb_class_name(Some("UnknownCrumb".into()));
        assert_eq!(config.crumb_class().expect("class").name(), BASE_CRUMB_CLASS);
    }

    #[test]
    fn crumb_class_resolves_registered_subclass() {
        let mut config = Config::default();
        config.register_crumb_class("ActivityCrumb").expect("register");
        config.set_crumb_class_name(Some("ActivityCrumb".into()));
        assert_eq!(config.crumb_class().expect("class").name(), "ActivityCrumb");
    }

    #[test]
    fn crumb_class_rejects_non_crumb_types() {
        let mut config = Config::default();
        config.classes_mut().register("Comment", None).expect("register");
        config.set_crumb_class_name(Some("Comment".into()));
        assert!(matches!(
            config.crumb_class(),
            Err(ConfigError::InvalidCrumbClass(name)) if name == "Comment"
        ));
    }

    #[test]
    fn crumb_class_surfaces_malformed_names() {
        let mut config = Config::default();
        config.set_crumb_class_name(Some("activity crumb".into()));
        assert!(matches!(
            config.crumb_class(),
            Err(ConfigError::InvalidClassName(_))
        ));
    }

    #[test]
    fn summary_omits_password() {
        let mut config = Config::default();
        config
            .set_connection("redis://:secret@localhost:6379/2")
            .expect("connection");
        config.set_mortality(Some(Duration::from_secs(60)));

        let json = serde_json::to_value(config.summary()).expect("json");
        assert_eq!(json["namespace"], "redcrumbs");
        assert_eq!(json["mortality_secs"], 60);
        assert_eq!(json["adapter"]["db"], 2);
        assert_eq!(json["creator"]["class_name"], "User");
        assert!(!json.to_string().contains("secret"));
    }
}
