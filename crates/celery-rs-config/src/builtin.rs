//! Built-in setting table and the process-wide resolver over it.

use crate::{
    ConfigError, ConfigOption, Defaults, Namespace, NamespaceTree, NamespaceTreeBuilder,
    OptionType, Resolver, SearchResult,
};
use serde_json::json;
use std::sync::{Arc, LazyLock};

/// Worker pool implementation used unless configured otherwise.
pub const DEFAULT_POOL: &str = "prefork";
/// Content types accepted by default.
pub const DEFAULT_ACCEPT_CONTENT: &[&str] = &["json", "pickle", "msgpack", "yaml"];
pub const DEFAULT_PROCESS_LOG_FMT: &str =
    "[%(asctime)s: %(levelname)s/%(processName)s] %(message)s";
pub const DEFAULT_LOG_FMT: &str = "[%(asctime)s: %(levelname)s] %(message)s";
pub const DEFAULT_TASK_LOG_FMT: &str = "[%(asctime)s: %(levelname)s/%(processName)s] \
     %(task_name)s[%(task_id)s]: %(message)s";

/// One day, in seconds.
const RESULT_EXPIRES_SECS: f64 = 86_400.0;

/// The built-in namespace tree.
pub static NAMESPACES: LazyLock<Arc<NamespaceTree>> =
    LazyLock::new(|| Arc::new(builtin_tree().build_unchecked()));

/// Defaults for every built-in setting, keyed by qualified name.
pub static DEFAULTS: LazyLock<Arc<Defaults>> =
    LazyLock::new(|| Arc::new(Defaults::from_tree(&NAMESPACES)));

static RESOLVER: LazyLock<Resolver> =
    LazyLock::new(|| Resolver::with_defaults(Arc::clone(&*NAMESPACES), Arc::clone(&*DEFAULTS)));

/// Process-wide resolver over the built-in table.
pub fn resolver() -> &'static Resolver {
    &RESOLVER
}

/// Resolve a built-in setting name in the default namespace.
pub fn find(name: &str) -> Result<Arc<SearchResult>, ConfigError> {
    RESOLVER.find(name)
}

/// Resolve a built-in setting name, trying `namespace` first.
pub fn find_in(name: &str, namespace: &str) -> Result<Arc<SearchResult>, ConfigError> {
    RESOLVER.find_in(name, namespace)
}

fn opt(default: impl Into<serde_json::Value>, ty: OptionType) -> ConfigOption {
    ConfigOption::new(default).with_type(ty)
}

fn unset(ty: OptionType) -> ConfigOption {
    ConfigOption::unset().with_type(ty)
}

fn string(default: &str) -> ConfigOption {
    ConfigOption::new(default)
}

pub(crate) fn builtin_tree() -> NamespaceTreeBuilder {
    use OptionType::{Any, Bool, Dict, Float, Int, List, Tuple};
    let text = OptionType::String;

    NamespaceTree::builder()
        .option("accept_content", opt(DEFAULT_ACCEPT_CONTENT.to_vec(), List))
        .option("admins", opt(json!([]), Tuple))
        .option("enable_utc", opt(true, Bool))
        .option("imports", opt(json!([]), Tuple))
        .option("include", opt(json!([]), Tuple))
        .option("server_email", string("celery@localhost"))
        .option("timezone", unset(text))
        .namespace(
            "beat",
            Namespace::new()
                .option("schedule", opt(json!({}), Dict))
                .option("scheduler", string("celery.beat:PersistentScheduler"))
                .option("schedule_filename", string("celerybeat-schedule"))
                .option("sync_every", opt(0, Int))
                .option("max_loop_interval", opt(0, Float)),
        )
        .namespace(
            "broker",
            Namespace::new()
                .option("url", unset(text))
                .option("connection_timeout", opt(4, Float))
                .option("connection_retry", opt(true, Bool))
                .option("connection_max_retries", opt(100, Int))
                .option("failover_strategy", unset(text))
                .option("heartbeat", unset(Int))
                .option("heartbeat_checkrate", opt(3.0, Int))
                .option("login_method", unset(text))
                .option("pool_limit", opt(10, Int))
                .option("use_ssl", opt(false, Bool))
                .option("transport", unset(text))
                .option("transport_options", opt(json!({}), Dict))
                .option("host", unset(text))
                .option("port", unset(Int))
                .option("user", unset(text))
                .option("password", unset(text))
                .option("vhost", unset(text)),
        )
        .namespace(
            "cache",
            Namespace::new()
                .option("backend", ConfigOption::unset())
                .option("backend_options", opt(json!({}), Dict)),
        )
        .namespace(
            "cassandra",
            Namespace::new()
                .option("column_family", unset(text))
                .option("detailed_mode", opt(false, Bool))
                .option("keyspace", unset(text))
                .option("read_consistency", unset(text))
                .option("servers", unset(List))
                .option("port", unset(text))
                .option("entry_ttl", unset(Float))
                .option("write_consistency", unset(text)),
        )
        .namespace(
            "chord",
            Namespace::new().option("propagates", opt(true, Bool)),
        )
        .namespace(
            "couchbase",
            Namespace::new().option("backend_settings", unset(Dict)),
        )
        .namespace(
            "email",
            Namespace::new()
                .option("host", string("localhost"))
                .option("port", opt(25, Int))
                .option("host_user", ConfigOption::unset())
                .option("host_password", ConfigOption::unset())
                .option("timeout", opt(2, Float))
                .option("use_ssl", opt(false, Bool))
                .option("use_tls", opt(false, Bool))
                .option("charset", string("us-ascii")),
        )
        .namespace(
            "mongodb",
            Namespace::new().option("backend_settings", unset(Dict)),
        )
        .namespace(
            "event",
            Namespace::new()
                .option("serializer", string("json"))
                .option("queue_expires", opt(60.0, Float))
                .option("queue_ttl", opt(5.0, Float)),
        )
        .namespace(
            "redis",
            Namespace::new()
                .option("db", unset(Int))
                .option("host", unset(text))
                .option("max_connections", unset(Int))
                .option("password", unset(text))
                .option("port", unset(Int)),
        )
        .namespace(
            "result",
            Namespace::new()
                .option("backend", unset(text))
                .option("cache_max", opt(100, Int))
                .option("compression", unset(text))
                .option("exchange", string("celeryresults"))
                .option("exchange_type", string("direct"))
                .option("persistent", unset(Bool))
                .option("expires", opt(RESULT_EXPIRES_SECS, Float))
                .option("serializer", string("json")),
        )
        .namespace(
            "riak",
            Namespace::new().option("backend_settings", unset(Dict)),
        )
        .namespace(
            "security",
            Namespace::new()
                .option("key", unset(text))
                .option("certificate", unset(text))
                .option("cert_store", unset(text)),
        )
        .namespace(
            "sqlalchemy",
            Namespace::new()
                .option("short_lived_sessions", opt(false, Bool))
                .option("table_names", unset(Dict))
                .option("dburi", ConfigOption::unset())
                .option("engine_options", unset(Dict)),
        )
        .namespace(
            "task",
            Namespace::new()
                .option("acks_late", opt(false, Bool))
                .option("always_eager", opt(false, Bool))
                .option("annotations", unset(Any))
                .option("create_missing_queues", opt(true, Bool))
                .option("default_rate_limit", unset(text))
                .option("default_routing_key", string("celery"))
                .option("default_queue", string("celery"))
                .option("default_exchange", string("celery"))
                .option("default_exchange_type", string("direct"))
                .option("default_delivery_mode", opt(2, text))
                .option("eager_propagates_exceptions", opt(false, Bool))
                .option("ignore_result", opt(false, Bool))
                .option("compression", unset(text))
                .option("reject_on_worker_lost", unset(Bool))
                .option("routes", unset(Any))
                .option("send_error_emails", opt(false, Bool))
                .option("send_sent_event", opt(false, Bool))
                .option("store_errors_even_if_ignored", opt(false, Bool))
                .option("protocol", opt(1, Int))
                .option("publish_retry", opt(true, Bool))
                .option(
                    "publish_retry_policy",
                    opt(
                        json!({
                            "max_retries": 3,
                            "interval_start": 0,
                            "interval_max": 1,
                            "interval_step": 0.2,
                        }),
                        Dict,
                    ),
                )
                .option("serializer", string("json"))
                .option("soft_time_limit", unset(Float))
                .option("time_limit", unset(Float))
                .option("track_started", opt(false, Bool))
                .option("queues", unset(Dict))
                .option("queue_ha_policy", unset(text))
                .option("queue_max_priority", unset(Int)),
        )
        .namespace(
            "worker",
            Namespace::new()
                .option("agent", unset(text))
                .option("autoscaler", string("celery.worker.autoscale:Autoscaler"))
                .option("autoreloader", string("celery.worker.autoreload:Autoreloader"))
                .option("concurrency", opt(0, Int))
                .option("disable_rate_limits", opt(false, Bool))
                .option("timer", unset(text))
                .option("timer_precision", opt(1.0, Float))
                .option("force_execv", opt(false, Bool))
                .option("hijack_root_logger", opt(true, Bool))
                .option("consumer", string("celery.worker.consumer:Consumer"))
                .option("enable_remote_control", opt(true, Bool))
                .option("log_format", string(DEFAULT_PROCESS_LOG_FMT))
                .option("log_color", unset(Bool))
                .option("max_tasks_per_child", unset(Int))
                .option("pool", string(DEFAULT_POOL))
                .option("pool_putlocks", opt(true, Bool))
                .option("pool_restarts", opt(false, Bool))
                .option("prefetch_multiplier", opt(4, Int))
                .option("send_events", opt(false, Bool))
                .option("state_db", ConfigOption::unset())
                .option("task_log_format", string(DEFAULT_TASK_LOG_FMT))
                .option("redirect_stdouts", opt(true, Bool))
                .option("redirect_stdouts_level", string("WARNING"))
                .option("direct", opt(false, Bool))
                .option("lost_wait", opt(10.0, Float)),
        )
}
