// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub Uuid);

impl MemberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Icon reference stored in the file table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberIcon {
    pub file_id: String,
    pub file_name: String,
}

/// Filterable view of a member, as read from the directory.
///
/// Only `office_name`, `department_name` and `skill_names` are consulted by
/// the admission filters; the rest is carried through to the group detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    #[serde(rename = "userId")]
    pub member_id: MemberId,
    #[serde(rename = "userName")]
    pub member_name: String,
    #[serde(rename = "userIcon")]
    pub icon: MemberIcon,
    pub office_name: String,
    pub department_name: String,
    pub skill_names: Vec<String>,
}

impl MemberProfile {
    pub fn has_any_skill(&self, skills: &[String]) -> bool {
        skills.iter().any(|s| self.skill_names.contains(s))
    }

    pub fn summary(&self) -> MemberSummary {
        MemberSummary {
            member_id: self.member_id,
            member_name: self.member_name.clone(),
            icon: self.icon.clone(),
            office_name: self.office_name.clone(),
        }
    }
}

/// Member as listed inside a match group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    #[serde(rename = "userId")]
    pub member_id: MemberId,
    #[serde(rename = "userName")]
    pub member_name: String,
    #[serde(rename = "userIcon")]
    pub icon: MemberIcon,
    pub office_name: String,
}
