//! Warnings for deprecated settings that are set on a live configuration.

use crate::NamespaceTree;
use log::warn;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Read access to configured values by qualified name.
pub trait SettingSource {
    fn setting(&self, name: &str) -> Option<&Value>;
}

impl SettingSource for Map<String, Value> {
    fn setting(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl SettingSource for HashMap<String, Value> {
    fn setting(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl SettingSource for BTreeMap<String, Value> {
    fn setting(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

impl SettingSource for Value {
    fn setting(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(name))
    }
}

/// Truthiness of a configured value: null, false, zero and empty values are unset.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Stage of a deprecation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeprecationKind {
    /// Scheduled for deprecation in a future version.
    Pending,
    /// Already deprecated, scheduled for removal.
    Deprecated,
}

/// A deprecated setting found set on a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeprecationNotice {
    pub setting: String,
    pub kind: DeprecationKind,
    pub deprecate_by: Option<String>,
    pub remove_by: Option<String>,
    pub alternative: Option<String>,
}

impl DeprecationNotice {
    pub fn description(&self) -> String {
        format!("The '{}' setting", self.setting)
    }
}

impl fmt::Display for DeprecationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = self.description();
        match (self.kind, &self.deprecate_by, &self.remove_by) {
            (DeprecationKind::Pending, Some(deprecation), Some(removal)) => write!(
                f,
                "{description} is scheduled for deprecation in version {deprecation} \
                 and removal in version v{removal}."
            )?,
            (DeprecationKind::Pending, deprecation, _) => write!(
                f,
                "{description} is scheduled for deprecation in version {}.",
                deprecation.as_deref().unwrap_or("unknown")
            )?,
            (DeprecationKind::Deprecated, _, removal) => write!(
                f,
                "{description} is deprecated and scheduled for removal in version {}.",
                removal.as_deref().unwrap_or("unknown")
            )?,
        }
        if let Some(alternative) = &self.alternative {
            write!(f, " Use the {alternative} instead")?;
        }
        Ok(())
    }
}

/// Collect a notice for every deprecated setting that is set to a truthy value.
pub fn find_deprecated_settings<S>(tree: &NamespaceTree, source: &S) -> Vec<DeprecationNotice>
where
    S: SettingSource + ?Sized,
{
    tree.flatten()
        .filter(|(_, option)| option.is_deprecated())
        .filter(|(name, _)| source.setting(name).is_some_and(is_truthy))
        .map(|(name, option)| DeprecationNotice {
            setting: name,
            kind: if option.deprecate_by.is_some() {
                DeprecationKind::Pending
            } else {
                DeprecationKind::Deprecated
            },
            deprecate_by: option.deprecate_by.clone(),
            remove_by: option.remove_by.clone(),
            alternative: option.alt.clone(),
        })
        .collect()
}

/// Log a warning for each deprecated setting in use and hand the source back.
pub fn scan<'a, S>(tree: &NamespaceTree, source: &'a S) -> &'a S
where
    S: SettingSource + ?Sized,
{
    for notice in find_deprecated_settings(tree, source) {
        warn!("deprecated setting in use (setting={}): {notice}", notice.setting);
    }
    source
}
