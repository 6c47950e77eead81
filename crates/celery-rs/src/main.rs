//! Inspect the built-in setting schema.

use anyhow::Context;
use celery_rs::commands;
use celery_rs::config::DEFAULT_NAMESPACE;
use clap::{Parser, Subcommand};
use log::info;
use std::io;
use std::path::PathBuf;

/// Command-line options for the settings inspector.
#[derive(Parser)]
#[command(name = "celery-settings", version)]
struct Cli {
    /// Emit JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every setting with its type and default
    List,
    /// Resolve a setting name
    Find {
        /// Short, qualified or namespace name
        name: String,
        /// Namespace to try first
        #[arg(long, default_value = DEFAULT_NAMESPACE)]
        namespace: String,
    },
    /// Validate a JSON5 settings file and report deprecated settings
    Check {
        /// Path to the settings file
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    celery_rs::init_logging();

    let cli = Cli::parse();
    let resolver = commands::builtin_resolver();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::List => commands::list(&resolver, &mut out, cli.json),
        Command::Find { name, namespace } => {
            info!("resolving setting from cli (name={name}, namespace={namespace})");
            commands::find(&resolver, &mut out, &name, &namespace, cli.json)
        }
        Command::Check { path } => commands::check(&resolver, &mut out, &path)
            .map(|_| ())
            .context("settings check failed"),
    }
}
