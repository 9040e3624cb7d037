//! Explicit registry of crumb record classes.
//!
//! Record classes are registered by name together with their parent, forming a small
//! single-inheritance tree rooted at [`BASE_CRUMB_CLASS`]. The configured class name is looked
//! up here instead of being resolved dynamically.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Name of the built-in record class every crumb class must descend from.
pub const BASE_CRUMB_CLASS: &str = "Redcrumbs::Crumb";

/// Errors raised by the class registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassError {
    /// The name is not a well-formed `Module::ClassName` path.
    #[error("Invalid class name: {0:?}")]
    InvalidName(String),
    /// A class cannot be registered under a parent that does not exist yet.
    #[error("Unknown parent class {parent:?} for {name:?}")]
    UnknownParent {
        /// Class being registered.
        name: String,
        /// Missing parent.
        parent: String,
    },
    /// The base class cannot be replaced.
    #[error("{0} is built in and cannot be re-registered")]
    BaseRedefinition(String),
}

/// A registered record class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordClass {
    name: String,
    parent: Option<String>,
}

impl RecordClass {
    /// Fully qualified class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent class name; `None` only for the base class and unrelated roots.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }
}

/// Outcome of a class lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// The name is registered.
    Found(&'a RecordClass),
    /// No class is registered under the name.
    Missing,
}

/// Name-to-class registry, populated at startup.
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    classes: HashMap<String, RecordClass>,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry {
    /// Create a registry containing only the base crumb class.
    pub fn new() -> Self {
        let base = RecordClass {
            name: BASE_CRUMB_CLASS.to_string(),
            parent: None,
        };
        Self {
            classes: HashMap::from([(base.name.clone(), base)]),
        }
    }

    /// The built-in base record class.
    pub fn base(&self) -> &RecordClass {
        &self.classes[BASE_CRUMB_CLASS]
    }

    /// Register `name` as a subclass of `parent`, or as an unrelated root when `parent` is
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ClassError`] for malformed names, unknown parents, or an attempt to replace
    /// the base class.
    pub fn register(&mut self, name: &str, parent: Option<&str>) -> Result<(), ClassError> {
        let name = normalize_class_name(name)?;
        if name == BASE_CRUMB_CLASS {
            return Err(ClassError::BaseRedefinition(name));
        }

        let parent = parent.map(normalize_class_name).transpose()?;
        if let Some(parent) = &parent
            && !self.classes.contains_key(parent)
        {
            return Err(ClassError::UnknownParent {
                name,
                parent: parent.clone(),
            });
        }

        tracing::debug!(class = %name, parent = ?parent, "Registered record class");
        self.classes.insert(name.clone(), RecordClass { name, parent });
        Ok(())
    }

    /// Look up a class by name.
    ///
    /// # Errors
    ///
    /// Returns [`ClassError::InvalidName`] when `name` is not a well-formed class path; a
    /// well-formed name that is not registered yields [`Lookup::Missing`].
    pub fn lookup(&self, name: &str) -> Result<Lookup<'_>, ClassError> {
        let name = normalize_class_name(name)?;
        Ok(self
            .classes
            .get(&name)
            .map_or(Lookup::Missing, Lookup::Found))
    }

    /// Whether `class` is `ancestor` or descends from it.
    pub fn is_subclass_of(&self, class: &RecordClass, ancestor: &str) -> bool {
        let mut current = Some(class);
        // Bounded by the registry size so a malformed chain cannot loop.
        for _ in 0..=self.classes.len() {
            let Some(class) = current else {
                return false;
            };
            if class.name == ancestor {
                return true;
            }
            current = class
                .parent
                .as_deref()
                .and_then(|parent| self.classes.get(parent));
        }
        false
    }

    /// Whether `class` is a crumb record class.
    pub fn is_crumb_class(&self, class: &RecordClass) -> bool {
        self.is_subclass_of(class, BASE_CRUMB_CLASS)
    }
}

/// Validate and normalize a `Module::ClassName` path, dropping a leading `::`.
pub fn normalize_class_name(name: &str) -> Result<String, ClassError> {
    let trimmed = name.trim();
    let path = trimmed.strip_prefix("::").unwrap_or(trimmed);

    let valid = !path.is_empty()
        && path.split("::").all(|segment| {
            let mut chars = segment.chars();
            chars.next().is_some_and(|first| first.is_ascii_uppercase())
                && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        });

    if valid {
        Ok(path.to_string())
    } else {
        Err(ClassError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_class_is_registered() {
        let registry = ClassRegistry::new();
        assert_eq!(registry.base().name(), BASE_CRUMB_CLASS);
        assert!(registry.is_crumb_class(registry.base()));
    }

    #[test]
    fn lookup_distinguishes_missing_and_found() {
        let mut registry = ClassRegistry::new();
        registry
            .register("ActivityCrumb", Some(BASE_CRUMB_CLASS))
            .expect("register");

        assert!(matches!(
            registry.lookup("ActivityCrumb"),
            Ok(Lookup::Found(class)) if class.name() == "ActivityCrumb"
        ));
        assert!(matches!(
            registry.lookup("::ActivityCrumb"),
            Ok(Lookup::Found(_))
        ));
        assert_eq!(registry.lookup("NoSuchCrumb"), Ok(Lookup::Missing));
    }

    #[test]
    fn malformed_names_are_errors() {
        let registry = ClassRegistry::new();
        for name in ["", "activity_crumb", "Activity-Crumb", "Foo::", "Foo:::Bar"] {
            assert!(
                matches!(registry.lookup(name), Err(ClassError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn subclass_check_walks_parents() {
        let mut registry = ClassRegistry::new();
        registry
            .register("ActivityCrumb", Some(BASE_CRUMB_CLASS))
            .expect("register");
        registry
            .register("Audit::LoginCrumb", Some("ActivityCrumb"))
            .expect("register");
        registry.register("Comment", None).expect("register");

        let Ok(Lookup::Found(login)) = registry.lookup("Audit::LoginCrumb") else {
            panic!("login crumb missing");
        };
        assert!(registry.is_crumb_class(login));
        assert!(registry.is_subclass_of(login, "ActivityCrumb"));

        let Ok(Lookup::Found(comment)) = registry.lookup("Comment") else {
            panic!("comment missing");
        };
        assert!(!registry.is_crumb_class(comment));
    }

    #[test]
    fn registration_rejects_unknown_parent_and_base() {
        let mut registry = ClassRegistry::new();
        assert_eq!(
            registry.register("Orphan", Some("Missing")),
            Err(ClassError::UnknownParent {
                name: "Orphan".into(),
                parent: "Missing".into(),
            })
        );
        assert_eq!(
            registry.register("Redcrumbs::Crumb", None),
            Err(ClassError::BaseRedefinition(BASE_CRUMB_CLASS.into()))
        );
    }
}
