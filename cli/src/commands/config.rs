// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use huddle_core::domain::server_config::{ServerConfigManifest, StorageConfig};

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./huddle-config.yaml)
        #[arg(short, long, default_value = "./huddle-config.yaml")]
        output: PathBuf,

        /// Include commented examples for every section
        #[arg(long)]
        examples: bool,
    },
}

pub async fn handle_command(
    command: ConfigCommand,
    config_override: Option<PathBuf>,
) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output, examples } => generate(output, examples).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        match &config_override {
            Some(path) => println!("  0. --config flag: {}", path.display()),
            None => println!("  0. --config flag: {}", "(not set)".dimmed()),
        }
        for (i, path) in ServerConfigManifest::search_paths().iter().enumerate() {
            let marker = if path.exists() { "✓".green() } else { "-".dimmed() };
            println!("  {}. {} {}", i + 1, marker, path.display());
        }
        println!();
    }

    let config = ServerConfigManifest::load_or_default(config_override)
        .context("Failed to load configuration")?;

    println!("{}", "Current configuration:".bold());
    println!();
    println!("  Name: {}", config.metadata.name);
    println!(
        "  Listen: {}:{}",
        config.spec.server.bind_address, config.spec.server.port
    );

    match &config.spec.storage {
        StorageConfig::InMemory { seed_file } => {
            println!("  Storage: in-memory");
            if let Some(seed) = seed_file {
                println!("    Seed file: {}", seed.display());
            }
        }
        StorageConfig::Postgres {
            max_connections, ..
        } => {
            // connection string may carry credentials
            println!("  Storage: postgres (max {} connections)", max_connections);
        }
    }

    println!("  Match timeout: {}ms", config.spec.matching.timeout_ms);
    println!(
        "  Logging: {} ({:?})",
        config.spec.logging.level, config.spec.logging.format
    );
    println!();

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = ServerConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

async fn generate(output: PathBuf, with_examples: bool) -> Result<()> {
    if with_examples {
        std::fs::write(&output, include_str!("../../templates/config-with-examples.yaml"))
            .with_context(|| format!("Failed to write config to {:?}", output))?;
    } else {
        ServerConfigManifest::default()
            .to_yaml_file(&output)
            .with_context(|| format!("Failed to write config to {:?}", output))?;
    }

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
