//! Qualified name to default value projection of a namespace tree.

use crate::NamespaceTree;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

/// Default value for every setting, keyed by qualified name.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Defaults {
    values: HashMap<String, Value>,
}

impl Defaults {
    /// Project each flattened option onto its default.
    pub fn from_tree(tree: &NamespaceTree) -> Self {
        let values = tree
            .flatten()
            .map(|(name, option)| (name, option.default.clone()))
            .collect();
        Self { values }
    }

    /// Default for a qualified name, if registered.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Copy the table into a JSON object, e.g. to seed a settings map.
    pub fn to_map(&self) -> serde_json::Map<String, Value> {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ConfigOption, Namespace, OptionType};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn projects_defaults_by_qualified_name() {
        let tree = NamespaceTree::builder()
            .option("enable_utc", ConfigOption::new(true).with_type(OptionType::Bool))
            .namespace(
                "email",
                Namespace::new()
                    .option("host", ConfigOption::new("localhost"))
                    .option("port", ConfigOption::new(25).with_type(OptionType::Int))
                    .option("host_user", ConfigOption::unset()),
            )
            .build()
            .expect("tree");
        let defaults = Defaults::from_tree(&tree);

        assert_eq!(defaults.len(), 4);
        assert_eq!(defaults.get("enable_utc"), Some(&json!(true)));
        assert_eq!(defaults.get("email_port"), Some(&json!(25)));
        assert_eq!(defaults.get("email_host_user"), Some(&Value::Null));
        assert!(!defaults.contains("port"));
        assert_eq!(Defaults::from_tree(&tree), defaults);
    }
}
