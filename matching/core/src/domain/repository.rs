// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Domain Repository Interfaces
//!
//! Persistence contracts consumed by the match-group use cases. Interfaces
//! live in the domain layer and are implemented in
//! `crate::infrastructure::repositories`.
//!
//! | Trait | Concern | Implementations |
//! |-------|---------|-----------------|
//! | `MemberDirectory` | Member profiles, random draws, group membership | `InMemoryDirectory`, `PostgresMemberDirectory` |
//! | `SkillRegistry` | Known skill names | `InMemoryDirectory`, `PostgresMemberDirectory` |
//!
//! ## Storage Backend Abstraction
//!
//! The concrete implementation is selected at startup from the `storage`
//! section of the server configuration. The in-memory directory backs
//! development and tests; PostgreSQL backs production.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::domain::match_group::{MatchGroup, MatchGroupDetail, MatchGroupId};
use crate::domain::member::{MemberId, MemberProfile};

/// Storage backend enum for pluggable persistence
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// Optionally seeded from a YAML file of skills and members
    InMemory { seed_file: Option<PathBuf> },
    PostgreSQL(PostgresConfig),
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub connection_string: String,
    pub max_connections: u32,
}

/// Read/write access to the member directory and its match-group tables.
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Filterable profile of one member
    async fn get_member_profile(&self, id: MemberId) -> Result<Option<MemberProfile>, RepositoryError>;

    /// One member drawn uniformly at random, with replacement, from the whole
    /// directory. Consecutive calls may return the same member.
    async fn get_random_member_profile(&self) -> Result<MemberProfile, RepositoryError>;

    /// Every member who has shared any group with `id`, whatever the group's
    /// status or who created it.
    async fn get_co_members_ever_matched(&self, id: MemberId) -> Result<HashSet<MemberId>, RepositoryError>;

    /// Write the group row and one membership row per member, atomically.
    async fn persist_group(&self, group: &MatchGroup) -> Result<(), RepositoryError>;

    /// Fully hydrated detail view of one group
    async fn get_group_detail(&self, id: MatchGroupId) -> Result<Option<MatchGroupDetail>, RepositoryError>;

    /// Ids of every group `id` belongs to
    async fn get_group_ids_by_member(&self, id: MemberId) -> Result<Vec<MatchGroupId>, RepositoryError>;
}

#[async_trait]
pub trait SkillRegistry: Send + Sync {
    async fn has_skill(&self, name: &str) -> Result<bool, RepositoryError>;

    /// First name in `names` that is not a registered skill.
    async fn check_skills_registered(&self, names: &[String]) -> Result<Option<String>, RepositoryError> {
        for name in names {
            if !self.has_skill(name).await? {
                return Ok(Some(name.clone()));
            }
        }
        Ok(None)
    }
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepositoryError::NotFound("Row not found".to_string()),
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}
