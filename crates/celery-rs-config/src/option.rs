//! Schema entry for a single setting.

use crate::ConfigError;
use crate::coerce;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Closed set of coercion kinds a setting can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    #[default]
    String,
    Int,
    Float,
    Bool,
    List,
    Tuple,
    Dict,
    Any,
}

impl OptionType {
    /// Every supported type, in the order they are documented.
    pub const ALL: [OptionType; 8] = [
        OptionType::String,
        OptionType::Int,
        OptionType::Float,
        OptionType::Bool,
        OptionType::List,
        OptionType::Tuple,
        OptionType::Dict,
        OptionType::Any,
    ];

    /// Type tag as written in schema definitions.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::String => "string",
            OptionType::Int => "int",
            OptionType::Float => "float",
            OptionType::Bool => "bool",
            OptionType::List => "list",
            OptionType::Tuple => "tuple",
            OptionType::Dict => "dict",
            OptionType::Any => "any",
        }
    }

    /// Convert a raw value with this type's converter.
    pub fn coerce(&self, raw: &Value) -> Result<Value, ConfigError> {
        match self {
            OptionType::String => coerce::to_string(raw),
            OptionType::Int => coerce::to_int(raw),
            OptionType::Float => coerce::to_float(raw),
            OptionType::Bool => coerce::to_bool(raw),
            OptionType::List | OptionType::Tuple => coerce::to_sequence(*self, raw),
            OptionType::Dict => coerce::to_dict(raw),
            OptionType::Any => Ok(raw.clone()),
        }
    }
}

impl FromStr for OptionType {
    type Err = ConfigError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        OptionType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == tag)
            .ok_or_else(|| ConfigError::UnknownType(tag.to_string()))
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Typed default plus coercion and deprecation metadata for one setting.
///
/// Options are built once when the schema is assembled and never change
/// afterwards. A `Null` default means the setting has no default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigOption {
    #[serde(default)]
    pub default: Value,
    #[serde(default, rename = "type")]
    pub ty: OptionType,
    /// Name of the setting that replaces this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Version in which the setting becomes deprecated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecate_by: Option<String>,
    /// Version in which the setting is removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_by: Option<String>,
    /// Extension attributes carried alongside the known fields.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl ConfigOption {
    /// Create a string-typed option with the given default.
    pub fn new(default: impl Into<Value>) -> Self {
        Self {
            default: default.into(),
            ..Self::default()
        }
    }

    /// Create a string-typed option without a default.
    pub fn unset() -> Self {
        Self::default()
    }

    /// Set the coercion type.
    pub fn with_type(mut self, ty: OptionType) -> Self {
        self.ty = ty;
        self
    }

    /// Set the coercion type from its textual tag.
    pub fn with_type_tag(self, tag: &str) -> Result<Self, ConfigError> {
        Ok(self.with_type(tag.parse()?))
    }

    /// Name the setting that replaces this one.
    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn with_deprecate_by(mut self, version: impl Into<String>) -> Self {
        self.deprecate_by = Some(version.into());
        self
    }

    pub fn with_remove_by(mut self, version: impl Into<String>) -> Self {
        self.remove_by = Some(version.into());
        self
    }

    /// Attach an extension attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    /// Whether the option is scheduled for deprecation or removal.
    pub fn is_deprecated(&self) -> bool {
        self.deprecate_by.is_some() || self.remove_by.is_some()
    }

    /// Convert a raw value according to the declared type.
    pub fn coerce(&self, raw: &Value) -> Result<Value, ConfigError> {
        self.ty.coerce(raw)
    }
}

impl fmt::Display for ConfigOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Option: type->{} default->{}>", self.ty, self.default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn type_tags_parse_and_reject_unknown() {
        for ty in OptionType::ALL {
            assert_eq!(ty.as_str().parse::<OptionType>(), Ok(ty));
        }
        assert_eq!(
            "str".parse::<OptionType>(),
            Err(ConfigError::UnknownType("str".to_string()))
        );
        assert!(ConfigOption::unset().with_type_tag("datetime").is_err());
    }

    #[test]
    fn option_defaults_to_string_type() {
        let option = ConfigOption::new("celery@localhost");
        assert_eq!(option.ty, OptionType::String);
        assert_eq!(option.default, json!("celery@localhost"));
        assert!(!option.is_deprecated());
        assert_eq!(ConfigOption::unset().default, Value::Null);
    }

    #[test]
    fn display_matches_schema_notation() {
        let option = ConfigOption::new(4).with_type(OptionType::Int);
        assert_eq!(option.to_string(), "<Option: type->int default->4>");
        assert_eq!(
            ConfigOption::unset().to_string(),
            "<Option: type->string default->null>"
        );
    }

    #[test]
    fn serializes_type_under_type_key() {
        let option = ConfigOption::new(true)
            .with_type(OptionType::Bool)
            .with_alt("broker_use_ssl")
            .with_attr("section", "broker");
        let value = serde_json::to_value(&option).expect("serialize");
        assert_eq!(
            value,
            json!({
                "default": true,
                "type": "bool",
                "alt": "broker_use_ssl",
                "extra": { "section": "broker" }
            })
        );
        let decoded: ConfigOption = serde_json::from_value(value).expect("decode");
        assert_eq!(decoded, option);
    }

    #[test]
    fn bool_option_accepts_true_tokens() {
        let option = ConfigOption::new(false).with_type(OptionType::Bool);
        for raw in ["true", "True", "1", "yes", "ON"] {
            assert_eq!(option.coerce(&json!(raw)).expect(raw), json!(true));
        }
        let err = option.coerce(&json!("maybe")).unwrap_err();
        assert!(matches!(err, ConfigError::TypeCoercion { .. }));
        assert_eq!(
            err.to_string(),
            "cannot coerce \"maybe\" to type bool: unrecognized boolean token"
        );
    }
}
