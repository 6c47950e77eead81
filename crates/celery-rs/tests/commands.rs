//! Tests for the settings inspector commands.

use celery_rs::commands::{self, builtin_resolver};
use celery_rs::config::{ConfigOption, Namespace, NamespaceTree, OptionType, Resolver};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn render(run: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>) -> String {
    let mut out = Vec::new();
    run(&mut out).expect("command");
    String::from_utf8(out).expect("utf8")
}

fn deprecating_resolver() -> Resolver {
    let tree = NamespaceTree::builder()
        .namespace(
            "worker",
            Namespace::new()
                .option("concurrency", ConfigOption::new(0).with_type(OptionType::Int))
                .option(
                    "autoreloader",
                    ConfigOption::unset()
                        .with_remove_by("5.0")
                        .with_alt("worker_pool_restarts"),
                ),
        )
        .build()
        .expect("tree");
    Resolver::new(Arc::new(tree))
}

#[test]
fn list_prints_every_setting() {
    let resolver = builtin_resolver();
    let text = render(|out| commands::list(&resolver, out, false));
    assert_eq!(text.lines().count(), resolver.defaults().len());
    let first = text.lines().next().expect("first line");
    assert!(first.starts_with("accept_content"));
    assert!(first.contains("list"));
}

#[test]
fn list_json_includes_option_metadata() {
    let resolver = builtin_resolver();
    let text = render(|out| commands::list(&resolver, out, true));
    let rows: Vec<Value> = serde_json::from_str(&text).expect("json");
    let pool = rows
        .iter()
        .find(|row| row["name"] == "broker_pool_limit")
        .expect("broker_pool_limit");
    assert_eq!(pool["option"], json!({ "default": 10, "type": "int" }));
}

#[test]
fn find_reports_namespace_and_key() {
    let resolver = builtin_resolver();
    let text = render(|out| commands::find(&resolver, out, "url", "celery", false));
    assert!(text.contains("namespace: broker\n"));
    assert!(text.contains("qualified: broker_url\n"));
}

#[test]
fn find_json_serializes_search_result() {
    let resolver = builtin_resolver();
    let text = render(|out| commands::find(&resolver, out, "broker_url", "celery", true));
    let value: Value = serde_json::from_str(&text).expect("json");
    assert_eq!(
        value,
        json!({
            "namespace": null,
            "key": "broker_url",
            "found": { "kind": "default", "value": null }
        })
    );
}

#[test]
fn find_unknown_setting_fails() {
    let resolver = builtin_resolver();
    let mut out = Vec::new();
    let err = commands::find(&resolver, &mut out, "nope", "celery", false).unwrap_err();
    assert!(format!("{err:#}").contains("unknown setting: nope"));
}

#[test]
fn check_validates_and_reports_deprecations() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("settings.json5");
    fs::write(
        &path,
        "{ concurrency: '4', worker: { autoreloader: 'custom:Reloader' } }",
    )
    .expect("write");

    let resolver = deprecating_resolver();
    let mut out = Vec::new();
    let report = commands::check(&resolver, &mut out, &path).expect("check");
    assert_eq!(report.settings.get("worker_concurrency"), Some(&json!(4)));
    assert_eq!(report.notices.len(), 1);
    assert_eq!(report.notices[0].setting, "worker_autoreloader");

    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("warning: The 'worker_autoreloader' setting is deprecated"));
    assert!(text.contains("2 settings ok, 1 deprecated"));
}

#[test]
fn check_rejects_unknown_settings() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("settings.json5");
    fs::write(&path, "{ not_a_setting: 1 }").expect("write");

    let resolver = builtin_resolver();
    let mut out = Vec::new();
    let err = commands::check(&resolver, &mut out, &path).unwrap_err();
    assert!(format!("{err:#}").contains("unknown setting"));
}

#[test]
fn check_requires_object_root() {
    let temp = TempDir::new().expect("tmp");
    let path = temp.path().join("settings.json5");
    fs::write(&path, "[1, 2]").expect("write");

    let err = commands::load_settings(&path).unwrap_err();
    assert!(err.to_string().contains("expected an object"));
}
