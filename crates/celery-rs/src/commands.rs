//! Commands behind the `celery-settings` binary.

use anyhow::{Context, bail};
use celery_rs_config::{
    DEFAULTS, DeprecationNotice, Found, NAMESPACES, Resolver, SearchResult,
    find_deprecated_settings, validate_settings,
};
use log::{debug, info};
use serde_json::{Map, Value, json};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Summary of a settings file check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    /// Coerced settings keyed by qualified name.
    pub settings: Map<String, Value>,
    /// Deprecated settings that are in use.
    pub notices: Vec<DeprecationNotice>,
}

/// Print every registered setting with its type and default.
pub fn list(resolver: &Resolver, out: &mut impl Write, as_json: bool) -> anyhow::Result<()> {
    let settings = resolver.tree().flatten();
    if as_json {
        let rows = settings
            .map(|(name, option)| json!({ "name": name, "option": option }))
            .collect::<Vec<_>>();
        writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
        return Ok(());
    }
    for (name, option) in settings {
        writeln!(out, "{name:<40} {:<6} {}", option.ty, option.default)?;
    }
    Ok(())
}

/// Resolve a setting name and print what it matched.
pub fn find(
    resolver: &Resolver,
    out: &mut impl Write,
    name: &str,
    namespace: &str,
    as_json: bool,
) -> anyhow::Result<()> {
    let result = resolver
        .find_in(name, namespace)
        .with_context(|| format!("failed to resolve {name:?}"))?;
    if as_json {
        writeln!(out, "{}", serde_json::to_string_pretty(result.as_ref())?)?;
        return Ok(());
    }
    write_result(out, &result)
}

fn write_result(out: &mut impl Write, result: &SearchResult) -> anyhow::Result<()> {
    writeln!(
        out,
        "namespace: {}",
        result.namespace.as_deref().unwrap_or("-")
    )?;
    writeln!(out, "key: {}", result.key)?;
    writeln!(out, "qualified: {}", result.qualified_name())?;
    match &result.found {
        Found::Setting(option) => writeln!(out, "option: {option}")?,
        Found::Namespace(namespace) => {
            writeln!(out, "namespace keys:")?;
            for (key, option) in namespace.iter() {
                writeln!(out, "  {key}: {option}")?;
            }
        }
        Found::Default(value) => writeln!(out, "default: {value}")?,
    }
    Ok(())
}

/// Read a JSON5 settings document; the root must be an object.
pub fn load_settings(path: &Path) -> anyhow::Result<Map<String, Value>> {
    debug!("loading settings from path: {}", path.display());
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: Value = json5::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("{}: expected an object of settings", path.display()),
    }
}

/// Validate a settings file and report deprecated settings in use.
pub fn check(
    resolver: &Resolver,
    out: &mut impl Write,
    path: &Path,
) -> anyhow::Result<CheckReport> {
    let raw = load_settings(path)?;
    let label = path.display().to_string();
    let settings = validate_settings(resolver, &raw, &label)
        .with_context(|| format!("invalid settings in {label}"))?;
    let notices = find_deprecated_settings(resolver.tree(), &settings);
    for notice in &notices {
        writeln!(out, "warning: {notice}")?;
    }
    writeln!(
        out,
        "{label}: {} settings ok, {} deprecated",
        settings.len(),
        notices.len()
    )?;
    info!(
        "settings check finished (path={label}, settings={}, deprecated={})",
        settings.len(),
        notices.len()
    );
    Ok(CheckReport { settings, notices })
}

/// Resolver used by the binary: a fresh one over the built-in table.
pub fn builtin_resolver() -> Resolver {
    Resolver::with_defaults(Arc::clone(&*NAMESPACES), Arc::clone(&*DEFAULTS))
}
