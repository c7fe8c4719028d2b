// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Huddle CLI
//!
//! The `huddle` binary runs the match-group HTTP server and talks to a running
//! one.
//!
//! ## Commands
//!
//! - `huddle serve` - Run the HTTP API in the foreground
//! - `huddle config show|validate|generate` - Configuration management
//! - `huddle group create|list` - Match group operations against a server

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use huddle_cli::commands::{self, ConfigCommand, GroupCommand};
use huddle_cli::server;
use huddle_core::domain::server_config::{LogFormat, ServerConfigManifest};

/// Huddle - randomized match groups for your member directory
#[derive(Parser)]
#[command(name = "huddle")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "HUDDLE_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// HTTP API port (serve: overrides config; client: server to contact)
    #[arg(long, global = true, env = "HUDDLE_PORT")]
    port: Option<u16>,

    /// HTTP API host (serve: bind address; client: server to contact)
    #[arg(long, global = true, env = "HUDDLE_HOST")]
    host: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "HUDDLE_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the match-group HTTP server
    #[command(name = "serve")]
    Serve,

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Match group operations against a running server
    #[command(name = "group")]
    Group {
        #[command(subcommand)]
        command: GroupCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => {
            let mut config = ServerConfigManifest::load_or_default(cli.config)
                .context("Failed to load configuration")?;

            let level = cli
                .log_level
                .unwrap_or_else(|| config.spec.logging.level.clone());
            init_logging(&level, config.spec.logging.format)?;

            if let Some(host) = cli.host {
                config.spec.server.bind_address = host;
            }
            if let Some(port) = cli.port {
                config.spec.server.port = port;
            }

            server::start_server(config).await
        }
        Some(Commands::Config { command }) => {
            init_logging(cli.log_level.as_deref().unwrap_or("warn"), LogFormat::Compact)?;
            commands::config::handle_command(command, cli.config).await
        }
        Some(Commands::Group { command }) => {
            init_logging(cli.log_level.as_deref().unwrap_or("warn"), LogFormat::Compact)?;
            let host = cli.host.as_deref().unwrap_or(commands::DEFAULT_HOST);
            let port = cli.port.unwrap_or(commands::DEFAULT_PORT);
            commands::group::handle_command(command, host, port).await
        }
        None => {
            eprintln!("{}", "No command specified. Use --help for usage.".yellow());
            std::process::exit(1);
        }
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    match format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }

    Ok(())
}
