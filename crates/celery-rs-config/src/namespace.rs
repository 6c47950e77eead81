//! Two-level namespace tree holding every registered setting.
//!
//! The tree keeps declaration order: resolver tie-breaking and flatten
//! output both depend on it.

use crate::flatten::Flatten;
use crate::{ConfigError, ConfigOption};
use log::debug;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashSet;

/// A named group of settings (e.g. `broker`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Namespace {
    entries: Vec<(String, ConfigOption)>,
}

impl Namespace {
    /// Create an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a setting to the namespace.
    pub fn option(mut self, key: impl Into<String>, option: ConfigOption) -> Self {
        self.entries.push((key.into(), option));
        self
    }

    /// Look up a key exactly as stored.
    pub fn get(&self, key: &str) -> Option<&ConfigOption> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, option)| option)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate keys and options in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigOption)> {
        self.entries
            .iter()
            .map(|(name, option)| (name.as_str(), option))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[(String, ConfigOption)] {
        &self.entries
    }
}

impl Serialize for Namespace {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, option) in &self.entries {
            map.serialize_entry(key, option)?;
        }
        map.end()
    }
}

/// A top-level tree entry: either a bare setting or a namespace.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Setting(ConfigOption),
    Namespace(Namespace),
}

impl Entry {
    pub fn as_option(&self) -> Option<&ConfigOption> {
        match self {
            Entry::Setting(option) => Some(option),
            Entry::Namespace(_) => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&Namespace> {
        match self {
            Entry::Setting(_) => None,
            Entry::Namespace(namespace) => Some(namespace),
        }
    }
}

/// Full setting schema: top-level settings and namespaces, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NamespaceTree {
    entries: Vec<(String, Entry)>,
}

impl NamespaceTree {
    /// Start building a tree.
    pub fn builder() -> NamespaceTreeBuilder {
        NamespaceTreeBuilder::default()
    }

    /// Look up a top-level entry by its exact name.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, entry)| entry)
    }

    /// Look up a namespace by its exact name.
    pub fn namespace(&self, name: &str) -> Option<&Namespace> {
        self.get(name).and_then(Entry::as_namespace)
    }

    /// Iterate top-level entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enumerate every setting with its qualified name.
    pub fn flatten(&self) -> Flatten<'_> {
        Flatten::new(self, "")
    }

    /// Enumerate every setting, prefixing each qualified name.
    pub fn flatten_with_prefix(&self, prefix: &str) -> Flatten<'_> {
        Flatten::new(self, prefix)
    }

    /// Find the option behind a qualified name such as `broker_url`.
    pub fn get_qualified(&self, name: &str) -> Option<&ConfigOption> {
        self.flatten()
            .find(|(qualified, _)| qualified == name)
            .map(|(_, option)| option)
    }

    pub(crate) fn entries(&self) -> &[(String, Entry)] {
        &self.entries
    }
}

/// Builder that validates names before producing a `NamespaceTree`.
#[derive(Debug, Clone, Default)]
pub struct NamespaceTreeBuilder {
    entries: Vec<(String, Entry)>,
}

impl NamespaceTreeBuilder {
    /// Register a top-level setting.
    pub fn option(mut self, name: impl Into<String>, option: ConfigOption) -> Self {
        self.entries.push((name.into(), Entry::Setting(option)));
        self
    }

    /// Register a namespace of settings.
    pub fn namespace(mut self, name: impl Into<String>, namespace: Namespace) -> Self {
        self.entries.push((name.into(), Entry::Namespace(namespace)));
        self
    }

    /// Validate names and produce the tree.
    ///
    /// Names must be non-empty and lowercase, unique within their level, and
    /// every qualified name produced by flattening must be unique.
    pub fn build(self) -> Result<NamespaceTree, ConfigError> {
        let mut top_level = HashSet::new();
        for (name, entry) in &self.entries {
            validate_name(name, name)?;
            if !top_level.insert(name.as_str()) {
                return Err(invalid_schema(name, "duplicate entry"));
            }
            if let Entry::Namespace(namespace) = entry {
                let mut keys = HashSet::new();
                for (key, _) in namespace.entries() {
                    let path = format!("{name}.{key}");
                    validate_name(&path, key)?;
                    if !keys.insert(key.as_str()) {
                        return Err(invalid_schema(&path, "duplicate key"));
                    }
                }
            }
        }

        let tree = self.build_unchecked();
        let mut qualified = HashSet::new();
        for (name, _) in tree.flatten() {
            if qualified.contains(&name) {
                return Err(invalid_schema(&name, "qualified name collides"));
            }
            qualified.insert(name);
        }
        debug!(
            "namespace tree built (entries={}, settings={})",
            tree.len(),
            qualified.len()
        );
        Ok(tree)
    }

    /// Produce the tree without validation, for literal tables covered by tests.
    pub(crate) fn build_unchecked(self) -> NamespaceTree {
        NamespaceTree {
            entries: self.entries,
        }
    }
}

fn validate_name(path: &str, name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(invalid_schema(path, "empty name"));
    }
    if name.to_lowercase() != name {
        return Err(invalid_schema(path, "names must be lowercase"));
    }
    Ok(())
}

fn invalid_schema(path: &str, message: &str) -> ConfigError {
    ConfigError::InvalidSchema {
        path: path.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OptionType;
    use pretty_assertions::assert_eq;

    fn broker() -> Namespace {
        Namespace::new()
            .option("url", ConfigOption::unset())
            .option("pool_limit", ConfigOption::new(10).with_type(OptionType::Int))
    }

    #[test]
    fn builder_keeps_declaration_order() {
        let tree = NamespaceTree::builder()
            .option("timezone", ConfigOption::unset())
            .namespace("broker", broker())
            .option("enable_utc", ConfigOption::new(true).with_type(OptionType::Bool))
            .build()
            .expect("tree");
        let names = tree.iter().map(|(name, _)| name).collect::<Vec<_>>();
        assert_eq!(names, vec!["timezone", "broker", "enable_utc"]);
        assert_eq!(
            tree.namespace("broker").map(|ns| ns.keys().collect::<Vec<_>>()),
            Some(vec!["url", "pool_limit"])
        );
        assert!(tree.namespace("timezone").is_none());
    }

    #[test]
    fn rejects_uppercase_names() {
        let err = NamespaceTree::builder()
            .namespace("Broker", broker())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidSchema {
                path: "Broker".to_string(),
                message: "names must be lowercase".to_string(),
            }
        );
    }

    #[test]
    fn rejects_duplicate_keys() {
        let err = NamespaceTree::builder()
            .namespace(
                "broker",
                broker().option("url", ConfigOption::new("amqp://")),
            )
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("broker.url"));
    }

    #[test]
    fn rejects_qualified_name_collisions() {
        let err = NamespaceTree::builder()
            .option("broker_url", ConfigOption::unset())
            .namespace("broker", broker())
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidSchema {
                path: "broker_url".to_string(),
                message: "qualified name collides".to_string(),
            }
        );
    }

    #[test]
    fn qualified_lookup_finds_nested_option() {
        let tree = NamespaceTree::builder()
            .namespace("broker", broker())
            .build()
            .expect("tree");
        assert_eq!(
            tree.get_qualified("broker_pool_limit").map(|opt| opt.ty),
            Some(OptionType::Int)
        );
        assert!(tree.get_qualified("pool_limit").is_none());
    }

    #[test]
    fn namespace_serializes_as_ordered_map() {
        let value = serde_json::to_string(&broker()).expect("serialize");
        assert!(value.starts_with("{\"url\":"));
    }
}
