// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Shared fixtures for the match-group integration tests.
//!
//! `ScriptedDirectory` replays a fixed sequence of random draws, then keeps
//! returning the fallback candidate forever, so tests decide exactly which
//! candidates the sampler sees and in which order.

#![allow(dead_code)]

use async_trait::async_trait;
use huddle_core::domain::match_group::{
    DepartmentFilter, MatchGroup, MatchGroupConfig, MatchGroupDetail, MatchGroupId, OfficeFilter,
};
use huddle_core::domain::member::{MemberIcon, MemberId, MemberProfile};
use huddle_core::domain::repository::{MemberDirectory, RepositoryError, SkillRegistry};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

pub fn profile(name: &str, office: &str, department: &str, skills: &[&str]) -> MemberProfile {
    MemberProfile {
        member_id: MemberId::new(),
        member_name: name.to_string(),
        icon: MemberIcon {
            file_id: format!("{}-icon", name),
            file_name: format!("{}.png", name),
        },
        office_name: office.to_string(),
        department_name: department.to_string(),
        skill_names: skills.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn config(owner: &MemberProfile, num_of_members: u8) -> MatchGroupConfig {
    MatchGroupConfig {
        owner_id: owner.member_id,
        match_group_name: "coffee chat".to_string(),
        description: "".to_string(),
        num_of_members,
        department_filter: DepartmentFilter::None,
        office_filter: OfficeFilter::None,
        skill_filter: vec![],
        never_matched_filter: false,
    }
}

/// What `persist_group` does with a finished group.
#[derive(Default, Clone, Copy)]
pub enum WriteBehavior {
    #[default]
    Store,
    /// Fail the write with a database error.
    Fail,
    /// Report success without storing anything.
    Lose,
}

#[derive(Default)]
pub struct ScriptedDirectory {
    profiles: HashMap<MemberId, MemberProfile>,
    script: Mutex<VecDeque<MemberId>>,
    fallback: Option<MemberId>,
    ever_matched: HashSet<MemberId>,
    skills: HashSet<String>,
    persisted: Mutex<Vec<MatchGroup>>,
    write: WriteBehavior,
    pub draws: AtomicUsize,
    pub ever_matched_calls: AtomicUsize,
}

impl ScriptedDirectory {
    pub fn new(members: &[&MemberProfile]) -> Self {
        let mut directory = Self::default();
        for m in members {
            directory.profiles.insert(m.member_id, (*m).clone());
            directory.skills.extend(m.skill_names.iter().cloned());
        }
        directory
    }

    /// Candidates returned by the first draws, in order.
    pub fn with_draws(self, draws: &[&MemberProfile]) -> Self {
        *self.script.lock() = draws.iter().map(|m| m.member_id).collect();
        self
    }

    /// Candidate returned once the script runs out.
    pub fn then_forever(mut self, member: &MemberProfile) -> Self {
        self.fallback = Some(member.member_id);
        self
    }

    pub fn with_ever_matched(mut self, members: &[&MemberProfile]) -> Self {
        self.ever_matched = members.iter().map(|m| m.member_id).collect();
        self
    }

    pub fn with_skill(mut self, name: &str) -> Self {
        self.skills.insert(name.to_string());
        self
    }

    pub fn with_writes(mut self, write: WriteBehavior) -> Self {
        self.write = write;
        self
    }

    pub fn draw_count(&self) -> usize {
        self.draws.load(Ordering::SeqCst)
    }

    pub fn ever_matched_count(&self) -> usize {
        self.ever_matched_calls.load(Ordering::SeqCst)
    }

    pub fn persisted(&self) -> Vec<MatchGroup> {
        self.persisted.lock().clone()
    }
}

#[async_trait]
impl MemberDirectory for ScriptedDirectory {
    async fn get_member_profile(&self, id: MemberId) -> Result<Option<MemberProfile>, RepositoryError> {
        Ok(self.profiles.get(&id).cloned())
    }

    async fn get_random_member_profile(&self) -> Result<MemberProfile, RepositoryError> {
        self.draws.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().pop_front().or(self.fallback);
        let id = next.ok_or_else(|| RepositoryError::NotFound("script exhausted".to_string()))?;
        self.profiles
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn get_co_members_ever_matched(&self, _id: MemberId) -> Result<HashSet<MemberId>, RepositoryError> {
        self.ever_matched_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.ever_matched.clone())
    }

    async fn persist_group(&self, group: &MatchGroup) -> Result<(), RepositoryError> {
        match self.write {
            WriteBehavior::Store => self.persisted.lock().push(group.clone()),
            WriteBehavior::Fail => {
                return Err(RepositoryError::Database("connection reset".to_string()))
            }
            WriteBehavior::Lose => {}
        }
        Ok(())
    }

    async fn get_group_detail(&self, id: MatchGroupId) -> Result<Option<MatchGroupDetail>, RepositoryError> {
        let persisted = self.persisted.lock();
        let Some(group) = persisted.iter().find(|g| g.id == id) else {
            return Ok(None);
        };
        let members = group
            .members
            .iter()
            .filter_map(|m| self.profiles.get(m).map(MemberProfile::summary))
            .collect();
        Ok(Some(MatchGroupDetail::from_group(group, members)))
    }

    async fn get_group_ids_by_member(&self, id: MemberId) -> Result<Vec<MatchGroupId>, RepositoryError> {
        Ok(self
            .persisted
            .lock()
            .iter()
            .filter(|g| g.members.contains(&id))
            .map(|g| g.id)
            .collect())
    }
}

#[async_trait]
impl SkillRegistry for ScriptedDirectory {
    async fn has_skill(&self, name: &str) -> Result<bool, RepositoryError> {
        Ok(self.skills.contains(name))
    }
}
