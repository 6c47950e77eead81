//! Namespace-aware lookup of setting names.
//!
//! A name is resolved by trying, in order:
//!
//! 1. the key inside the requested namespace;
//! 2. a scan over the tree in declaration order, where each entry matches
//!    either because its own name equals the requested name, or because it
//!    is a namespace containing the requested name as a key;
//! 3. the flattened defaults table, treating the name as already qualified.
//!
//! Successful lookups are memoized per resolver, keyed by the caller's exact
//! `(name, namespace)` arguments.

use crate::namespace::{Entry, Namespace, NamespaceTree};
use crate::{ConfigError, ConfigOption, Defaults};
use log::debug;
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Namespace used when the caller does not name one.
pub const DEFAULT_NAMESPACE: &str = "celery";

/// What a lookup matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Found {
    /// A single setting.
    Setting(ConfigOption),
    /// A whole namespace, matched by name.
    Namespace(Namespace),
    /// The default of a qualified name.
    Default(Value),
}

impl Found {
    pub fn as_option(&self) -> Option<&ConfigOption> {
        match self {
            Found::Setting(option) => Some(option),
            _ => None,
        }
    }
}

/// Outcome of a resolver query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Namespace the key was found in; `None` for namespace and qualified-name matches.
    pub namespace: Option<String>,
    pub key: String,
    pub found: Found,
}

impl SearchResult {
    /// Qualified name of the match (`broker_url` for namespace `broker`, key `url`).
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}_{}", self.key),
            None => self.key.clone(),
        }
    }
}

/// Resolver over an immutable tree with its own memoization cache.
#[derive(Debug)]
pub struct Resolver {
    tree: Arc<NamespaceTree>,
    defaults: Arc<Defaults>,
    cache: RwLock<HashMap<(String, String), Arc<SearchResult>>>,
}

impl Resolver {
    /// Create a resolver, deriving the defaults table from the tree.
    pub fn new(tree: Arc<NamespaceTree>) -> Self {
        let defaults = Arc::new(Defaults::from_tree(&tree));
        Self::with_defaults(tree, defaults)
    }

    /// Create a resolver sharing an already-built defaults table.
    pub fn with_defaults(tree: Arc<NamespaceTree>, defaults: Arc<Defaults>) -> Self {
        Self {
            tree,
            defaults,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn tree(&self) -> &Arc<NamespaceTree> {
        &self.tree
    }

    pub fn defaults(&self) -> &Arc<Defaults> {
        &self.defaults
    }

    /// Resolve a name against the default namespace.
    pub fn find(&self, name: &str) -> Result<Arc<SearchResult>, ConfigError> {
        self.find_in(name, DEFAULT_NAMESPACE)
    }

    /// Resolve a name, trying `namespace` first.
    pub fn find_in(&self, name: &str, namespace: &str) -> Result<Arc<SearchResult>, ConfigError> {
        let cache_key = (name.to_string(), namespace.to_string());
        if let Some(hit) = self.cache.read().get(&cache_key) {
            return Ok(Arc::clone(hit));
        }

        debug!("resolving setting (name={name}, namespace={namespace})");
        let result = Arc::new(self.search(name, namespace)?);
        // Concurrent misses compute the same result; keep whichever landed first.
        let mut cache = self.cache.write();
        Ok(Arc::clone(cache.entry(cache_key).or_insert(result)))
    }

    /// Resolve a name and coerce `raw` with the matched option.
    pub fn coerce(&self, name: &str, namespace: &str, raw: &Value) -> Result<Value, ConfigError> {
        let result = self.find_in(name, namespace)?;
        let option = match &result.found {
            Found::Setting(option) => option,
            Found::Default(_) => self
                .tree
                .get_qualified(&result.key)
                .ok_or_else(|| ConfigError::NotFound(result.key.clone()))?,
            Found::Namespace(_) => {
                return Err(ConfigError::InvalidField {
                    path: result.key.clone(),
                    message: "names a namespace, not a setting".to_string(),
                });
            }
        };
        option.coerce(raw)
    }

    /// Number of memoized lookups.
    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }

    fn search(&self, name: &str, namespace: &str) -> Result<SearchResult, ConfigError> {
        let name = name.to_lowercase();
        let namespace = namespace.to_lowercase();

        if let Some(option) = self.tree.namespace(&namespace).and_then(|ns| ns.get(&name)) {
            return Ok(SearchResult {
                namespace: Some(namespace),
                key: name,
                found: Found::Setting(option.clone()),
            });
        }

        for (entry_name, entry) in self.tree.iter() {
            if entry_name.to_lowercase() == name {
                let found = match entry {
                    Entry::Setting(option) => Found::Setting(option.clone()),
                    Entry::Namespace(keys) => Found::Namespace(keys.clone()),
                };
                return Ok(SearchResult {
                    namespace: None,
                    key: entry_name.to_string(),
                    found,
                });
            }
            if let Some(option) = entry.as_namespace().and_then(|keys| keys.get(&name)) {
                return Ok(SearchResult {
                    namespace: Some(entry_name.to_string()),
                    key: name,
                    found: Found::Setting(option.clone()),
                });
            }
        }

        match self.defaults.get(&name) {
            Some(default) => Ok(SearchResult {
                namespace: None,
                key: name,
                found: Found::Default(default.clone()),
            }),
            None => Err(ConfigError::NotFound(name)),
        }
    }
}
