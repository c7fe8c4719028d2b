// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Match Group Use Cases
//!
//! Application service behind the match-group HTTP endpoints.
//!
//! # DDD Pattern: Application Service
//!
//! - **Layer:** Application
//! - **Responsibility:** Orchestrate match group creation and listing
//! - **Collaborators:**
//!   - Domain: `MatchGroupConfig` validation, `AdmissionFilter`
//!   - Application: `GroupSampler`
//!   - Infrastructure: `MemberDirectory`, `SkillRegistry`
//!
//! # Create Flow
//!
//! 1. Validate name/description lengths, member count and skill names
//! 2. Reject unknown skills before any sampling happens
//! 3. Sample members via `GroupSampler`
//! 4. Persist the group and its memberships in one write
//! 5. Read back and return the hydrated `MatchGroupDetail`
//!
//! # Error Handling
//!
//! - `InvalidConfig` / `UnknownSkill`: request rejected, nothing sampled
//! - `MemberNotFound`: owner (or listed member) does not exist
//! - `Timeout`: sampling deadline exceeded, nothing persisted
//! - `Persistence`: directory read/write failed

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::application::group_sampler::{GroupSampler, SamplingError};
use crate::domain::match_group::{
    listing_order, ListMatchGroupsQuery, MatchGroupConfig, MatchGroupConfigError, MatchGroupDetail,
    MatchGroupSummary,
};
use crate::domain::member::MemberId;
use crate::domain::repository::{MemberDirectory, RepositoryError, SkillRegistry};

#[derive(Debug, Error)]
pub enum MatchGroupError {
    #[error("invalid match group config: {0}")]
    InvalidConfig(#[from] MatchGroupConfigError),

    #[error("{0} is not a registered skill")]
    UnknownSkill(String),

    #[error("member {0} not found")]
    MemberNotFound(MemberId),

    #[error("only {accepted} of {target} members found before timeout")]
    Timeout { accepted: usize, target: usize },

    #[error("persistence failure: {0}")]
    Persistence(#[from] RepositoryError),
}

impl From<SamplingError> for MatchGroupError {
    fn from(err: SamplingError) -> Self {
        match err {
            SamplingError::OwnerNotFound(id) => MatchGroupError::MemberNotFound(id),
            SamplingError::Timeout { accepted, target, .. } => MatchGroupError::Timeout { accepted, target },
            SamplingError::Directory(e) => MatchGroupError::Persistence(e),
        }
    }
}

#[async_trait]
pub trait MatchGroupService: Send + Sync {
    /// Create a match group for `config.owner_id`.
    ///
    /// `timeout` overrides the configured sampling deadline for this call.
    async fn create_match_group(
        &self,
        config: MatchGroupConfig,
        timeout: Option<Duration>,
    ) -> Result<MatchGroupDetail, MatchGroupError>;

    /// Groups `member_id` belongs to, open first, newest first, then by name.
    async fn list_member_match_groups(
        &self,
        member_id: MemberId,
        query: ListMatchGroupsQuery,
    ) -> Result<Vec<MatchGroupSummary>, MatchGroupError>;
}

pub struct StandardMatchGroupService {
    directory: Arc<dyn MemberDirectory>,
    skills: Arc<dyn SkillRegistry>,
    sampler: GroupSampler,
}

impl StandardMatchGroupService {
    pub fn new(
        directory: Arc<dyn MemberDirectory>,
        skills: Arc<dyn SkillRegistry>,
        default_timeout: Duration,
    ) -> Self {
        let sampler = GroupSampler::with_default_timeout(directory.clone(), default_timeout);
        Self {
            directory,
            skills,
            sampler,
        }
    }
}

#[async_trait]
impl MatchGroupService for StandardMatchGroupService {
    async fn create_match_group(
        &self,
        config: MatchGroupConfig,
        timeout: Option<Duration>,
    ) -> Result<MatchGroupDetail, MatchGroupError> {
        if let Err(e) = config.validate() {
            warn!(owner_id = %config.owner_id, "Rejected match group config: {}", e);
            return Err(e.into());
        }

        if let Some(unknown) = self.skills.check_skills_registered(&config.skill_filter).await? {
            warn!(owner_id = %config.owner_id, skill = %unknown, "Skill is not registered");
            return Err(MatchGroupError::UnknownSkill(unknown));
        }

        // the sampler reports its own timeout
        let group = self.sampler.sample(&config, timeout).await.map_err(|e| {
            if let SamplingError::Directory(err) = &e {
                error!(owner_id = %config.owner_id, "Directory failed while sampling: {}", err);
            }
            MatchGroupError::from(e)
        })?;

        self.directory.persist_group(&group).await.map_err(|e| {
            error!(match_group_id = %group.id, "Failed to persist match group: {}", e);
            MatchGroupError::Persistence(e)
        })?;

        let detail = self
            .directory
            .get_group_detail(group.id)
            .await
            .and_then(|detail| {
                detail.ok_or_else(|| {
                    RepositoryError::NotFound(format!("match group {} missing after insert", group.id))
                })
            })
            .map_err(|e| {
                error!(match_group_id = %group.id, "Failed to read back match group: {}", e);
                MatchGroupError::Persistence(e)
            })?;

        info!(
            match_group_id = %detail.match_group_id,
            owner_id = %detail.created_by,
            members = detail.members.len(),
            "Successfully created a new match group"
        );

        Ok(detail)
    }

    async fn list_member_match_groups(
        &self,
        member_id: MemberId,
        query: ListMatchGroupsQuery,
    ) -> Result<Vec<MatchGroupSummary>, MatchGroupError> {
        if self.directory.get_member_profile(member_id).await?.is_none() {
            warn!(member_id = %member_id, "Specified member does not exist");
            return Err(MatchGroupError::MemberNotFound(member_id));
        }

        let group_ids = self.directory.get_group_ids_by_member(member_id).await?;
        info!(member_id = %member_id, "Member participated in {} match groups", group_ids.len());

        let mut groups = Vec::with_capacity(group_ids.len());
        for id in group_ids {
            if let Some(detail) = self.directory.get_group_detail(id).await? {
                if query.status.admits(detail.status) {
                    groups.push(detail.into_summary());
                }
            }
        }

        groups.sort_by(listing_order);

        Ok(groups
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }
}
