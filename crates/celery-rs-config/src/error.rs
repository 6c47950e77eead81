//! Error types for schema construction, coercion and lookup.

use thiserror::Error;

/// Errors returned by the setting schema and resolver APIs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A raw value could not be converted to the option's declared type.
    #[error("cannot coerce {value} to type {ty}: {message}")]
    TypeCoercion {
        ty: String,
        value: String,
        message: String,
    },
    /// The setting name matched no namespace, key or qualified name.
    #[error("unknown setting: {0}")]
    NotFound(String),
    /// A type tag outside the coercion table.
    #[error("unknown option type: {0}")]
    UnknownType(String),
    /// The namespace tree definition is inconsistent.
    #[error("invalid schema at {path}: {message}")]
    InvalidSchema { path: String, message: String },
    /// A user-supplied setting failed validation.
    #[error("invalid setting at {path}: {message}")]
    InvalidField { path: String, message: String },
}
