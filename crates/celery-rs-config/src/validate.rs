//! Validation of user-supplied settings against the schema.

use crate::resolver::Found;
use crate::{ConfigError, ConfigOption, Resolver};
use log::{debug, info};
use serde_json::{Map, Value};

/// Resolve and coerce every entry of a settings object.
///
/// Keys may be short (`url`), qualified (`broker_url`) or namespace names
/// holding a nested object (`broker: { url: ... }`). `null` values are kept
/// as explicit unsets. Returns the coerced settings keyed by qualified name.
pub fn validate_settings(
    resolver: &Resolver,
    settings: &Map<String, Value>,
    label: &str,
) -> Result<Map<String, Value>, ConfigError> {
    let mut validated = Map::new();
    for (name, raw) in settings {
        let result = match resolver.find(name) {
            Ok(result) => result,
            Err(ConfigError::NotFound(_)) => {
                return Err(invalid_field(label, name, "unknown setting"));
            }
            Err(err) => return Err(err),
        };
        match &result.found {
            Found::Namespace(namespace) => {
                let Value::Object(nested) = raw else {
                    return Err(invalid_field(label, name, "expected object"));
                };
                for (key, raw) in nested {
                    let path = join_path(name, key);
                    let Some(option) = namespace.get(&key.to_lowercase()) else {
                        return Err(invalid_field(label, &path, "unknown setting"));
                    };
                    let qualified = format!("{}_{}", result.key, key.to_lowercase());
                    let value = coerce_field(option, raw, label, &path)?;
                    insert_unique(&mut validated, qualified, value, label, &path)?;
                }
            }
            Found::Setting(option) => {
                let value = coerce_field(option, raw, label, name)?;
                insert_unique(&mut validated, result.qualified_name(), value, label, name)?;
            }
            Found::Default(_) => {
                let option = resolver
                    .tree()
                    .get_qualified(&result.key)
                    .ok_or_else(|| invalid_field(label, name, "unknown setting"))?;
                let value = coerce_field(option, raw, label, name)?;
                insert_unique(&mut validated, result.key.clone(), value, label, name)?;
            }
        }
        debug!("validated setting (layer={label}, name={name})");
    }
    info!(
        "settings validated (layer={label}, count={})",
        validated.len()
    );
    Ok(validated)
}

fn coerce_field(
    option: &ConfigOption,
    raw: &Value,
    label: &str,
    path: &str,
) -> Result<Value, ConfigError> {
    if raw.is_null() {
        return Ok(Value::Null);
    }
    option
        .coerce(raw)
        .map_err(|err| invalid_field(label, path, &err.to_string()))
}

/// Each qualified setting may be given once, under any of its spellings.
fn insert_unique(
    validated: &mut Map<String, Value>,
    qualified: String,
    value: Value,
    label: &str,
    path: &str,
) -> Result<(), ConfigError> {
    if validated.contains_key(&qualified) {
        return Err(invalid_field(label, path, "duplicate setting"));
    }
    validated.insert(qualified, value);
    Ok(())
}

/// Join nested paths for error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn invalid_field(label: &str, path: &str, message: &str) -> ConfigError {
    ConfigError::InvalidField {
        path: format!("{label}:{path}"),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Namespace, NamespaceTree, OptionType};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn resolver() -> Resolver {
        let tree = NamespaceTree::builder()
            .option("enable_utc", ConfigOption::new(true).with_type(OptionType::Bool))
            .namespace(
                "broker",
                Namespace::new()
                    .option("url", ConfigOption::unset())
                    .option("pool_limit", ConfigOption::new(10).with_type(OptionType::Int)),
            )
            .build()
            .expect("tree");
        Resolver::new(Arc::new(tree))
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn accepts_short_qualified_and_nested_names() {
        let resolver = resolver();
        let settings = object(json!({
            "enable_utc": "no",
            "url": "amqp://guest@localhost//",
            "broker": { "pool_limit": "20" },
        }));
        let validated = validate_settings(&resolver, &settings, "app").expect("valid");
        assert_eq!(
            Value::Object(validated),
            json!({
                "enable_utc": false,
                "broker_url": "amqp://guest@localhost//",
                "broker_pool_limit": 20,
            })
        );
    }

    #[test]
    fn qualified_names_use_defaults_fallback() {
        let resolver = resolver();
        let settings = object(json!({ "broker_pool_limit": 5, "broker_url": null }));
        let validated = validate_settings(&resolver, &settings, "app").expect("valid");
        assert_eq!(validated.get("broker_pool_limit"), Some(&json!(5)));
        assert_eq!(validated.get("broker_url"), Some(&Value::Null));
    }

    #[test]
    fn rejects_unknown_setting() {
        let resolver = resolver();
        let settings = object(json!({ "broker": { "heartbeat": 10 } }));
        let err = validate_settings(&resolver, &settings, "app").unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidField {
                path: "app:broker.heartbeat".to_string(),
                message: "unknown setting".to_string(),
            }
        );
    }

    #[test]
    fn reports_coercion_failures_with_path() {
        let resolver = resolver();
        let settings = object(json!({ "pool_limit": "many" }));
        let err = validate_settings(&resolver, &settings, "app").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("app:pool_limit"));
        assert!(msg.contains("cannot coerce"));
    }

    #[test]
    fn namespace_requires_object() {
        let resolver = resolver();
        let settings = object(json!({ "broker": "amqp://" }));
        let err = validate_settings(&resolver, &settings, "app").unwrap_err();
        assert!(err.to_string().contains("expected object"));
    }

    #[test]
    fn rejects_setting_given_under_two_names() {
        let resolver = resolver();
        for settings in [
            json!({ "url": "amqp://a//", "broker_url": "amqp://b//" }),
            json!({ "pool_limit": 5, "broker": { "pool_limit": 6 } }),
        ] {
            let err = validate_settings(&resolver, &object(settings), "app").unwrap_err();
            let ConfigError::InvalidField { path, message } = err else {
                panic!("expected invalid field, got {err:?}");
            };
            assert_eq!(message, "duplicate setting");
            assert!(path.starts_with("app:"));
        }
    }
}
