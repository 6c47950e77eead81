//! Public surface for the celery-rs setting schema.
//!
//! Re-exports the schema crate and hosts the commands behind the
//! `celery-settings` inspection binary.

pub mod commands;

/// Re-export for convenience.
pub use celery_rs_config as config;

#[inline]
/// Initialize logging using env_logger.
///
/// Binaries are expected to call this early in startup so resolver and
/// deprecation diagnostics are visible.
pub fn init_logging() {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();
}
