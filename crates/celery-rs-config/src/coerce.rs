//! Conversion functions behind each `OptionType`.

use crate::{ConfigError, OptionType};
use serde_json::{Map, Number, Value};

/// Token table used for boolean settings.
const BOOL_TOKENS: &[(&str, bool)] = &[
    ("false", false),
    ("no", false),
    ("0", false),
    ("off", false),
    ("true", true),
    ("yes", true),
    ("1", true),
    ("on", true),
];

/// Parse a boolean token, case-insensitively.
pub fn parse_bool(term: &str) -> Option<bool> {
    let term = term.trim().to_lowercase();
    BOOL_TOKENS
        .iter()
        .find(|(token, _)| *token == term)
        .map(|(_, value)| *value)
}

pub(crate) fn to_string(raw: &Value) -> Result<Value, ConfigError> {
    match raw {
        Value::String(_) => Ok(raw.clone()),
        Value::Null => Err(coercion_error(OptionType::String, raw, "value is null")),
        other => Ok(Value::String(other.to_string())),
    }
}

pub(crate) fn to_int(raw: &Value) -> Result<Value, ConfigError> {
    match raw {
        Value::Number(number) => {
            if let Some(value) = number.as_i64() {
                return Ok(Value::from(value));
            }
            if let Some(value) = number.as_u64() {
                return Ok(Value::from(value));
            }
            let value = number.as_f64().unwrap_or(f64::NAN);
            let truncated = value.trunc();
            if truncated.is_finite() && truncated.abs() < i64::MAX as f64 {
                Ok(Value::from(truncated as i64))
            } else {
                Err(coercion_error(OptionType::Int, raw, "number out of range"))
            }
        }
        Value::Bool(flag) => Ok(Value::from(i64::from(*flag))),
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|err| coercion_error(OptionType::Int, raw, &err.to_string())),
        _ => Err(coercion_error(OptionType::Int, raw, "expected integer")),
    }
}

pub(crate) fn to_float(raw: &Value) -> Result<Value, ConfigError> {
    let value = match raw {
        Value::Number(number) => number.as_f64(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::String(text) => Some(
            text.trim()
                .parse::<f64>()
                .map_err(|err| coercion_error(OptionType::Float, raw, &err.to_string()))?,
        ),
        _ => None,
    };
    value
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| coercion_error(OptionType::Float, raw, "expected finite number"))
}

pub(crate) fn to_bool(raw: &Value) -> Result<Value, ConfigError> {
    match raw {
        Value::Bool(_) => Ok(raw.clone()),
        Value::String(text) => parse_bool(text)
            .map(Value::Bool)
            .ok_or_else(|| coercion_error(OptionType::Bool, raw, "unrecognized boolean token")),
        Value::Number(number) => match number.as_i64() {
            Some(0) => Ok(Value::Bool(false)),
            Some(1) => Ok(Value::Bool(true)),
            _ => Err(coercion_error(OptionType::Bool, raw, "expected 0 or 1")),
        },
        _ => Err(coercion_error(OptionType::Bool, raw, "expected boolean")),
    }
}

/// Arrays pass through; strings are split on commas.
pub(crate) fn to_sequence(ty: OptionType, raw: &Value) -> Result<Value, ConfigError> {
    match raw {
        Value::Array(_) => Ok(raw.clone()),
        Value::String(text) => Ok(Value::Array(
            text.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        )),
        _ => Err(coercion_error(ty, raw, "expected sequence")),
    }
}

/// Objects pass through; arrays of `[key, value]` pairs become objects.
pub(crate) fn to_dict(raw: &Value) -> Result<Value, ConfigError> {
    match raw {
        Value::Object(_) => Ok(raw.clone()),
        Value::Array(items) => {
            let mut map = Map::new();
            for (idx, item) in items.iter().enumerate() {
                match item {
                    Value::Array(pair) if pair.len() == 2 => {
                        let Some(key) = pair[0].as_str() else {
                            return Err(coercion_error(
                                OptionType::Dict,
                                raw,
                                &format!("pair {idx} has a non-string key"),
                            ));
                        };
                        map.insert(key.to_string(), pair[1].clone());
                    }
                    _ => {
                        return Err(coercion_error(
                            OptionType::Dict,
                            raw,
                            &format!("item {idx} is not a key/value pair"),
                        ));
                    }
                }
            }
            Ok(Value::Object(map))
        }
        _ => Err(coercion_error(OptionType::Dict, raw, "expected mapping")),
    }
}

fn coercion_error(ty: OptionType, raw: &Value, message: &str) -> ConfigError {
    ConfigError::TypeCoercion {
        ty: ty.to_string(),
        value: raw.to_string(),
        message: message.to_string(),
    }
}
