// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! Infrastructure implementations of the repository traits defined in
//! `crate::domain::repository`.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Persist and retrieve members and match groups
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! # Available Implementations
//!
//! - **PostgresMemberDirectory** - production directory backed by PostgreSQL
//! - **InMemoryDirectory** - lock-protected maps for development and tests,
//!   optionally seeded from a YAML file

pub mod postgres_directory;

use async_trait::async_trait;
use parking_lot::RwLock;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use crate::domain::match_group::{MatchGroup, MatchGroupDetail, MatchGroupId};
use crate::domain::member::{MemberId, MemberProfile};
use crate::domain::repository::{MemberDirectory, RepositoryError, SkillRegistry};

/// Initial contents for an [`InMemoryDirectory`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorySeed {
    /// Skills registered even if no member has them yet
    #[serde(default)]
    pub skills: Vec<String>,

    #[serde(default)]
    pub members: Vec<MemberProfile>,
}

impl DirectorySeed {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let seed = serde_yaml::from_str(&content)?;
        Ok(seed)
    }
}

#[derive(Default)]
struct DirectoryState {
    members: HashMap<MemberId, MemberProfile>,
    /// Insertion order, indexed by the random draw
    member_order: Vec<MemberId>,
    skills: HashSet<String>,
    groups: HashMap<MatchGroupId, MatchGroup>,
}

#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: DirectorySeed) -> Self {
        let directory = Self::new();
        for skill in seed.skills {
            directory.add_skill(skill);
        }
        for member in seed.members {
            directory.add_member(member);
        }
        directory
    }

    /// Insert or replace a member. Its skills are registered as well.
    pub fn add_member(&self, profile: MemberProfile) {
        let mut state = self.state.write();
        for skill in &profile.skill_names {
            state.skills.insert(skill.clone());
        }
        if !state.members.contains_key(&profile.member_id) {
            state.member_order.push(profile.member_id);
        }
        state.members.insert(profile.member_id, profile);
    }

    pub fn add_skill(&self, name: impl Into<String>) {
        self.state.write().skills.insert(name.into());
    }

    pub fn member_count(&self) -> usize {
        self.state.read().member_order.len()
    }

    pub fn group_count(&self) -> usize {
        self.state.read().groups.len()
    }

    pub fn membership_count(&self) -> usize {
        self.state.read().groups.values().map(|g| g.members.len()).sum()
    }
}

#[async_trait]
impl MemberDirectory for InMemoryDirectory {
    async fn get_member_profile(&self, id: MemberId) -> Result<Option<MemberProfile>, RepositoryError> {
        Ok(self.state.read().members.get(&id).cloned())
    }

    async fn get_random_member_profile(&self) -> Result<MemberProfile, RepositoryError> {
        let state = self.state.read();
        if state.member_order.is_empty() {
            return Err(RepositoryError::NotFound("member directory is empty".to_string()));
        }
        let index = rand::rng().random_range(0..state.member_order.len());
        let id = state.member_order[index];
        state
            .members
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(format!("member {}", id)))
    }

    async fn get_co_members_ever_matched(&self, id: MemberId) -> Result<HashSet<MemberId>, RepositoryError> {
        let state = self.state.read();
        Ok(state
            .groups
            .values()
            .filter(|g| g.members.contains(&id))
            .flat_map(|g| g.members.iter().copied())
            .collect())
    }

    async fn persist_group(&self, group: &MatchGroup) -> Result<(), RepositoryError> {
        let mut state = self.state.write();
        if let Some(missing) = group.members.iter().find(|m| !state.members.contains_key(m)) {
            return Err(RepositoryError::NotFound(format!("member {}", missing)));
        }
        state.groups.insert(group.id, group.clone());
        Ok(())
    }

    async fn get_group_detail(&self, id: MatchGroupId) -> Result<Option<MatchGroupDetail>, RepositoryError> {
        let state = self.state.read();
        let Some(group) = state.groups.get(&id) else {
            return Ok(None);
        };

        let members = group
            .members
            .iter()
            .map(|m| {
                state
                    .members
                    .get(m)
                    .map(MemberProfile::summary)
                    .ok_or_else(|| RepositoryError::NotFound(format!("member {}", m)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(MatchGroupDetail::from_group(group, members)))
    }

    async fn get_group_ids_by_member(&self, id: MemberId) -> Result<Vec<MatchGroupId>, RepositoryError> {
        let state = self.state.read();
        Ok(state
            .groups
            .values()
            .filter(|g| g.members.contains(&id))
            .map(|g| g.id)
            .collect())
    }
}

#[async_trait]
impl SkillRegistry for InMemoryDirectory {
    async fn has_skill(&self, name: &str) -> Result<bool, RepositoryError> {
        Ok(self.state.read().skills.contains(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::match_group::{DepartmentFilter, MatchGroupConfig, OfficeFilter};
    use crate::domain::member::MemberIcon;

    fn member(name: &str, skills: &[&str]) -> MemberProfile {
        MemberProfile {
            member_id: MemberId::new(),
            member_name: name.to_string(),
            icon: MemberIcon {
                file_id: format!("{}-icon", name),
                file_name: format!("{}.png", name),
            },
            office_name: "Tokyo".to_string(),
            department_name: "Engineering".to_string(),
            skill_names: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn group_of(members: &[&MemberProfile]) -> MatchGroup {
        let config = MatchGroupConfig {
            owner_id: members[0].member_id,
            match_group_name: "standup".to_string(),
            description: "".to_string(),
            num_of_members: members.len() as u8,
            department_filter: DepartmentFilter::None,
            office_filter: OfficeFilter::None,
            skill_filter: vec![],
            never_matched_filter: false,
        };
        MatchGroup::open(&config, members.iter().map(|m| m.member_id).collect())
    }

    #[tokio::test]
    async fn test_random_draw_on_empty_directory_fails() {
        let directory = InMemoryDirectory::new();
        assert!(matches!(
            directory.get_random_member_profile().await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_random_draw_returns_known_members() {
        let directory = InMemoryDirectory::new();
        let a = member("a", &[]);
        let b = member("b", &[]);
        directory.add_member(a.clone());
        directory.add_member(b.clone());

        for _ in 0..20 {
            let drawn = directory.get_random_member_profile().await.unwrap();
            assert!(drawn == a || drawn == b);
        }
    }

    #[tokio::test]
    async fn test_member_skills_are_registered() {
        let directory = InMemoryDirectory::new();
        directory.add_member(member("a", &["rust"]));
        directory.add_skill("go");

        assert!(directory.has_skill("rust").await.unwrap());
        assert!(directory.has_skill("go").await.unwrap());
        assert!(!directory.has_skill("cobol").await.unwrap());

        let unknown = directory
            .check_skills_registered(&["go".to_string(), "cobol".to_string(), "lisp".to_string()])
            .await
            .unwrap();
        assert_eq!(unknown, Some("cobol".to_string()));
    }

    #[tokio::test]
    async fn test_persist_and_read_back_group() {
        let directory = InMemoryDirectory::new();
        let a = member("a", &[]);
        let b = member("b", &[]);
        let c = member("c", &[]);
        for m in [&a, &b, &c] {
            directory.add_member(m.clone());
        }

        let group = group_of(&[&a, &b]);
        directory.persist_group(&group).await.unwrap();

        let detail = directory.get_group_detail(group.id).await.unwrap().unwrap();
        assert_eq!(detail.match_group_name, "standup");
        assert_eq!(detail.created_by, a.member_id);
        let ids: Vec<MemberId> = detail.members.iter().map(|m| m.member_id).collect();
        assert_eq!(ids, vec![a.member_id, b.member_id]);

        assert_eq!(directory.get_group_ids_by_member(b.member_id).await.unwrap(), vec![group.id]);
        assert!(directory.get_group_ids_by_member(c.member_id).await.unwrap().is_empty());
        assert!(directory.get_group_detail(MatchGroupId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_persist_rejects_unknown_member() {
        let directory = InMemoryDirectory::new();
        let a = member("a", &[]);
        let ghost = member("ghost", &[]);
        directory.add_member(a.clone());

        let result = directory.persist_group(&group_of(&[&a, &ghost])).await;
        assert!(result.is_err());
        assert_eq!(directory.group_count(), 0);
    }

    #[tokio::test]
    async fn test_ever_matched_spans_all_groups() {
        let directory = InMemoryDirectory::new();
        let owner = member("owner", &[]);
        let u1 = member("u1", &[]);
        let u2 = member("u2", &[]);
        let u3 = member("u3", &[]);
        for m in [&owner, &u1, &u2, &u3] {
            directory.add_member(m.clone());
        }

        // owner created one group, and was invited into another
        directory.persist_group(&group_of(&[&owner, &u1])).await.unwrap();
        directory.persist_group(&group_of(&[&u2, &owner])).await.unwrap();
        directory.persist_group(&group_of(&[&u3, &u1])).await.unwrap();

        let seen = directory.get_co_members_ever_matched(owner.member_id).await.unwrap();
        assert!(seen.contains(&u1.member_id));
        assert!(seen.contains(&u2.member_id));
        assert!(!seen.contains(&u3.member_id));
    }

    #[test]
    fn test_seed_from_yaml() {
        let yaml = r#"
skills: [figma]
members:
  - userId: 550e8400-e29b-41d4-a716-446655440000
    userName: Aiko
    userIcon: { fileId: f1, fileName: aiko.png }
    officeName: Osaka
    departmentName: Design
    skillNames: [sketching]
"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.yaml");
        std::fs::write(&path, yaml).unwrap();

        let directory = InMemoryDirectory::from_seed(DirectorySeed::from_yaml_file(&path).unwrap());
        assert_eq!(directory.member_count(), 1);
        let state = directory.state.read();
        assert!(state.skills.contains("figma"));
        assert!(state.skills.contains("sketching"));
    }
}
