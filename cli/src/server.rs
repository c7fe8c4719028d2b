// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP server bootstrap for `huddle serve`

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use huddle_core::application::repository_factory::create_repositories;
use huddle_core::application::StandardMatchGroupService;
use huddle_core::domain::server_config::ServerConfigManifest;
use huddle_core::presentation::api;

pub async fn start_server(config: ServerConfigManifest) -> Result<()> {
    config
        .validate()
        .context("Configuration validation failed")?;

    info!(
        "Huddle server '{}' starting (match timeout: {}ms)",
        config.metadata.name, config.spec.matching.timeout_ms
    );

    let repositories = create_repositories(&config.spec.storage.to_backend())
        .await
        .context("Failed to initialize storage")?;

    let service = Arc::new(StandardMatchGroupService::new(
        repositories.directory,
        repositories.skills,
        config.spec.matching.timeout(),
    ));

    let app = api::app(service);

    let addr = format!(
        "{}:{}",
        config.spec.server.bind_address, config.spec.server.port
    );
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Huddle listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Huddle server shutting down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
