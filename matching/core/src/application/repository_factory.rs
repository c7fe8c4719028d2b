// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Repository Factory - Application Layer
//!
//! Creates the concrete directory implementation for the configured storage
//! backend, keeping the domain layer free of infrastructure dependencies.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Wire repository traits to their implementations

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::domain::repository::{MemberDirectory, SkillRegistry, StorageBackend};
use crate::infrastructure::db::Database;
use crate::infrastructure::repositories::postgres_directory::PostgresMemberDirectory;
use crate::infrastructure::repositories::{DirectorySeed, InMemoryDirectory};

/// Both directory-facing traits, backed by the same store.
#[derive(Clone)]
pub struct Repositories {
    pub directory: Arc<dyn MemberDirectory>,
    pub skills: Arc<dyn SkillRegistry>,
}

impl Repositories {
    pub fn in_memory(directory: InMemoryDirectory) -> Self {
        let directory = Arc::new(directory);
        Self {
            directory: directory.clone(),
            skills: directory,
        }
    }
}

/// Connects to the configured backend. PostgreSQL backends run pending
/// migrations before the repositories are handed out.
pub async fn create_repositories(backend: &StorageBackend) -> Result<Repositories> {
    match backend {
        StorageBackend::InMemory { seed_file: None } => {
            Ok(Repositories::in_memory(InMemoryDirectory::new()))
        }
        StorageBackend::InMemory { seed_file: Some(path) } => {
            let seed = DirectorySeed::from_yaml_file(path)
                .with_context(|| format!("Failed to load directory seed {:?}", path))?;
            tracing::info!("Seeded in-memory directory with {} members", seed.members.len());
            Ok(Repositories::in_memory(InMemoryDirectory::from_seed(seed)))
        }
        StorageBackend::PostgreSQL(config) => {
            let database = Database::new(&config.connection_string, config.max_connections)
                .await
                .context("Failed to connect to PostgreSQL")?;
            database
                .migrate()
                .await
                .context("Failed to run database migrations")?;

            let directory = Arc::new(PostgresMemberDirectory::new(database.get_pool().clone()));
            Ok(Repositories {
                directory: directory.clone(),
                skills: directory,
            })
        }
    }
}
