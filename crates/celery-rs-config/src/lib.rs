//! Setting schema and namespace-aware lookup.
//!
//! This crate owns the table of known settings, their typed defaults and
//! coercion rules, and the resolver that maps short setting names such as
//! `url` onto their qualified form (`broker_url`).

mod builtin;
mod coerce;
mod defaults;
mod deprecation;
mod error;
mod flatten;
mod namespace;
mod option;
mod resolver;
mod validate;

/// Built-in setting table, its defaults and the process-wide resolver.
pub use builtin::{
    DEFAULT_ACCEPT_CONTENT, DEFAULT_LOG_FMT, DEFAULT_POOL, DEFAULT_PROCESS_LOG_FMT,
    DEFAULT_TASK_LOG_FMT, DEFAULTS, NAMESPACES, find, find_in, resolver,
};
pub use coerce::parse_bool;
pub use defaults::Defaults;
pub use deprecation::{
    DeprecationKind, DeprecationNotice, SettingSource, find_deprecated_settings, is_truthy, scan,
};
/// Public error type returned by schema, coercion and lookup APIs.
pub use error::ConfigError;
pub use flatten::{Flatten, SEPARATOR};
pub use namespace::{Entry, Namespace, NamespaceTree, NamespaceTreeBuilder};
pub use option::{ConfigOption, OptionType};
pub use resolver::{DEFAULT_NAMESPACE, Found, Resolver, SearchResult};
pub use validate::validate_settings;
