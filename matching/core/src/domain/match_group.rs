// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Match Group Aggregate
//!
//! Types for the "create match group" feature: the request-scoped
//! [`MatchGroupConfig`], the persisted [`MatchGroup`] aggregate and the
//! read-side [`MatchGroupDetail`] / [`MatchGroupSummary`] views.
//!
//! A `MatchGroup` is written exactly once per successful sampling run and only
//! changes afterwards through `open` → `close` status transitions, which are
//! owned by another part of the product.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Match group aggregate, configuration and listing rules

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::member::{MemberId, MemberSummary};

pub const MIN_MEMBERS: u8 = 2;
pub const MAX_MEMBERS: u8 = 8;
pub const MAX_NAME_CHARS: usize = 50;
pub const MAX_DESCRIPTION_CHARS: usize = 120;

pub const DEFAULT_LIST_LIMIT: i64 = 20;
pub const MAX_LIST_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchGroupId(pub Uuid);

impl MatchGroupId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MatchGroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MatchGroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchGroupStatus {
    Open,
    Close,
}

impl MatchGroupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchGroupStatus::Open => "open",
            MatchGroupStatus::Close => "close",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "open" => Some(MatchGroupStatus::Open),
            "close" => Some(MatchGroupStatus::Close),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DepartmentFilter {
    OnlyMyDepartment,
    ExcludeMyDepartment,
    #[default]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OfficeFilter {
    OnlyMyOffice,
    ExcludeMyOffice,
    #[default]
    None,
}

/// Match group creation request.
///
/// `owner_id` always comes from the authenticated session, never from the
/// client payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchGroupConfig {
    pub owner_id: MemberId,
    pub match_group_name: String,
    pub description: String,
    /// Target group size, owner included.
    pub num_of_members: u8,
    pub department_filter: DepartmentFilter,
    pub office_filter: OfficeFilter,
    /// OR-combined: a candidate passes when it has any listed skill.
    pub skill_filter: Vec<String>,
    pub never_matched_filter: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchGroupConfigError {
    #[error("matchGroupName must be {min} to {max} characters (got {actual})", min = 1, max = MAX_NAME_CHARS)]
    NameLength { actual: usize },

    #[error("description must be at most {max} characters (got {actual})", max = MAX_DESCRIPTION_CHARS)]
    DescriptionLength { actual: usize },

    #[error("numOfMembers must be {min} to {max} (got {actual})", min = MIN_MEMBERS, max = MAX_MEMBERS)]
    MemberCount { actual: i64 },

    #[error("skillFilter contains an empty skill name")]
    EmptySkillName,
}

impl MatchGroupConfig {
    /// Check lengths and ranges. Skill existence is checked separately against
    /// the skill registry.
    pub fn validate(&self) -> Result<(), MatchGroupConfigError> {
        let name_len = self.match_group_name.chars().count();
        if name_len < 1 || name_len > MAX_NAME_CHARS {
            return Err(MatchGroupConfigError::NameLength { actual: name_len });
        }

        let description_len = self.description.chars().count();
        if description_len > MAX_DESCRIPTION_CHARS {
            return Err(MatchGroupConfigError::DescriptionLength {
                actual: description_len,
            });
        }

        validate_member_count(i64::from(self.num_of_members))?;

        if self.skill_filter.iter().any(|s| s.is_empty()) {
            return Err(MatchGroupConfigError::EmptySkillName);
        }

        Ok(())
    }

    pub fn target_size(&self) -> usize {
        usize::from(self.num_of_members)
    }
}

/// Range check shared with the HTTP layer, which sees the raw JSON number
/// before it is narrowed to `u8`.
pub fn validate_member_count(n: i64) -> Result<u8, MatchGroupConfigError> {
    if n < i64::from(MIN_MEMBERS) || n > i64::from(MAX_MEMBERS) {
        return Err(MatchGroupConfigError::MemberCount { actual: n });
    }
    Ok(n as u8)
}

/// Aggregate root for an accepted match group.
///
/// # Invariants
///
/// - `members` holds distinct ids and starts with `created_by`.
/// - `members.len()` equals the requested `num_of_members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchGroup {
    pub id: MatchGroupId,
    pub name: String,
    pub description: String,
    pub members: Vec<MemberId>,
    pub status: MatchGroupStatus,
    pub created_by: MemberId,
    pub created_at: DateTime<Utc>,
}

impl MatchGroup {
    pub fn open(config: &MatchGroupConfig, members: Vec<MemberId>) -> Self {
        Self {
            id: MatchGroupId::new(),
            name: config.match_group_name.clone(),
            description: config.description.clone(),
            members,
            status: MatchGroupStatus::Open,
            created_by: config.owner_id,
            created_at: Utc::now(),
        }
    }
}

/// Detail view returned after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchGroupDetail {
    pub match_group_id: MatchGroupId,
    pub match_group_name: String,
    pub description: String,
    pub members: Vec<MemberSummary>,
    pub status: MatchGroupStatus,
    pub created_by: MemberId,
    /// `YYYY-MM-DD`
    pub created_at: String,
}

impl MatchGroupDetail {
    pub fn from_group(group: &MatchGroup, members: Vec<MemberSummary>) -> Self {
        Self {
            match_group_id: group.id,
            match_group_name: group.name.clone(),
            description: group.description.clone(),
            members,
            status: group.status,
            created_by: group.created_by,
            created_at: format_created_date(&group.created_at),
        }
    }

    pub fn into_summary(self) -> MatchGroupSummary {
        MatchGroupSummary {
            match_group_id: self.match_group_id,
            match_group_name: self.match_group_name,
            members: self.members,
            status: self.status,
            created_by: self.created_by,
            created_at: self.created_at,
        }
    }
}

/// Listing view: the detail without its description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchGroupSummary {
    pub match_group_id: MatchGroupId,
    pub match_group_name: String,
    pub members: Vec<MemberSummary>,
    pub status: MatchGroupStatus,
    pub created_by: MemberId,
    pub created_at: String,
}

pub fn format_created_date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    Open,
    #[default]
    All,
}

impl StatusFilter {
    pub fn admits(&self, status: MatchGroupStatus) -> bool {
        match self {
            StatusFilter::Open => status == MatchGroupStatus::Open,
            StatusFilter::All => true,
        }
    }
}

/// Normalized paging parameters for listing a member's groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListMatchGroupsQuery {
    pub status: StatusFilter,
    pub limit: usize,
    pub offset: usize,
}

impl Default for ListMatchGroupsQuery {
    fn default() -> Self {
        Self {
            status: StatusFilter::All,
            limit: DEFAULT_LIST_LIMIT as usize,
            offset: 0,
        }
    }
}

impl ListMatchGroupsQuery {
    /// Out-of-range or missing values fall back to the defaults instead of
    /// failing the request.
    pub fn normalize(status: Option<&str>, limit: Option<i64>, offset: Option<i64>) -> Self {
        let status = match status {
            Some("open") => StatusFilter::Open,
            _ => StatusFilter::All,
        };
        let limit = match limit {
            Some(l) if (0..=MAX_LIST_LIMIT).contains(&l) => l as usize,
            _ => DEFAULT_LIST_LIMIT as usize,
        };
        let offset = match offset {
            Some(o) if o >= 0 => o as usize,
            _ => 0,
        };
        Self { status, limit, offset }
    }
}

/// Open groups first, then newest first, then by name.
pub fn listing_order(a: &MatchGroupSummary, b: &MatchGroupSummary) -> Ordering {
    let rank = |s: MatchGroupStatus| match s {
        MatchGroupStatus::Open => 0,
        MatchGroupStatus::Close => 1,
    };
    rank(a.status)
        .cmp(&rank(b.status))
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.match_group_name.cmp(&b.match_group_name))
}
