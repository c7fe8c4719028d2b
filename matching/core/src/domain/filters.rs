// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Admission Filters
//!
//! Pure predicates deciding whether a randomly drawn candidate may join a
//! match group. Every predicate compares the candidate against the owner, so
//! the owner itself is never evaluated.
//!
//! The four filters are independent and AND-combined; an inactive filter
//! (`None`, an empty skill list, `never_matched_filter == false`) never
//! rejects.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Candidate admission rules for the group sampler

use std::collections::HashSet;

use crate::domain::match_group::{DepartmentFilter, MatchGroupConfig, OfficeFilter};
use crate::domain::member::{MemberId, MemberProfile};

pub fn passes_department_filter(
    filter: DepartmentFilter,
    owner: &MemberProfile,
    candidate: &MemberProfile,
) -> bool {
    match filter {
        DepartmentFilter::OnlyMyDepartment => candidate.department_name == owner.department_name,
        DepartmentFilter::ExcludeMyDepartment => candidate.department_name != owner.department_name,
        DepartmentFilter::None => true,
    }
}

pub fn passes_office_filter(
    filter: OfficeFilter,
    owner: &MemberProfile,
    candidate: &MemberProfile,
) -> bool {
    match filter {
        OfficeFilter::OnlyMyOffice => candidate.office_name == owner.office_name,
        OfficeFilter::ExcludeMyOffice => candidate.office_name != owner.office_name,
        OfficeFilter::None => true,
    }
}

pub fn passes_skill_filter(skills: &[String], candidate: &MemberProfile) -> bool {
    skills.is_empty() || candidate.has_any_skill(skills)
}

/// `ever_matched` is `None` when the filter is off.
pub fn passes_never_matched_filter(
    ever_matched: Option<&HashSet<MemberId>>,
    candidate: &MemberProfile,
) -> bool {
    ever_matched.is_none_or(|ids| !ids.contains(&candidate.member_id))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Department,
    Office,
    Skill,
    NeverMatched,
    Duplicate,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::Department => "department filter",
            Rejection::Office => "office filter",
            Rejection::Skill => "skill filter",
            Rejection::NeverMatched => "never matched filter",
            Rejection::Duplicate => "already a member",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admit,
    Reject(Rejection),
}

/// Filters bound to one owner for the duration of a sampling run.
///
/// The ever-matched set only depends on the owner, so it is resolved once by
/// the caller and handed in here.
pub struct AdmissionFilter<'a> {
    config: &'a MatchGroupConfig,
    owner: &'a MemberProfile,
    ever_matched: Option<&'a HashSet<MemberId>>,
}

impl<'a> AdmissionFilter<'a> {
    pub fn new(
        config: &'a MatchGroupConfig,
        owner: &'a MemberProfile,
        ever_matched: Option<&'a HashSet<MemberId>>,
    ) -> Self {
        Self {
            config,
            owner,
            ever_matched,
        }
    }

    /// Gates are checked in order: department, office, skill, never-matched,
    /// duplicate. The first failing gate is reported.
    pub fn evaluate(&self, candidate: &MemberProfile, accepted: &[MemberId]) -> Admission {
        if !passes_department_filter(self.config.department_filter, self.owner, candidate) {
            return Admission::Reject(Rejection::Department);
        }
        if !passes_office_filter(self.config.office_filter, self.owner, candidate) {
            return Admission::Reject(Rejection::Office);
        }
        if !passes_skill_filter(&self.config.skill_filter, candidate) {
            return Admission::Reject(Rejection::Skill);
        }
        if !passes_never_matched_filter(self.ever_matched, candidate) {
            return Admission::Reject(Rejection::NeverMatched);
        }
        if accepted.contains(&candidate.member_id) {
            return Admission::Reject(Rejection::Duplicate);
        }
        Admission::Admit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::member::MemberIcon;

    fn profile(department: &str, office: &str, skills: &[&str]) -> MemberProfile {
        MemberProfile {
            member_id: MemberId::new(),
            member_name: "member".to_string(),
            icon: MemberIcon {
                file_id: "icon".to_string(),
                file_name: "icon.png".to_string(),
            },
            office_name: office.to_string(),
            department_name: department.to_string(),
            skill_names: skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn config(owner: &MemberProfile) -> MatchGroupConfig {
        MatchGroupConfig {
            owner_id: owner.member_id,
            match_group_name: "coffee".to_string(),
            description: "".to_string(),
            num_of_members: 4,
            department_filter: DepartmentFilter::None,
            office_filter: OfficeFilter::None,
            skill_filter: vec![],
            never_matched_filter: false,
        }
    }

    #[test]
    fn test_department_filter() {
        let owner = profile("sales", "tokyo", &[]);
        let same = profile("sales", "osaka", &[]);
        let other = profile("dev", "tokyo", &[]);

        assert!(passes_department_filter(DepartmentFilter::OnlyMyDepartment, &owner, &same));
        assert!(!passes_department_filter(DepartmentFilter::OnlyMyDepartment, &owner, &other));
        assert!(!passes_department_filter(DepartmentFilter::ExcludeMyDepartment, &owner, &same));
        assert!(passes_department_filter(DepartmentFilter::ExcludeMyDepartment, &owner, &other));
        assert!(passes_department_filter(DepartmentFilter::None, &owner, &other));
    }

    #[test]
    fn test_office_filter() {
        let owner = profile("sales", "tokyo", &[]);
        let same = profile("dev", "tokyo", &[]);
        let other = profile("sales", "osaka", &[]);

        assert!(passes_office_filter(OfficeFilter::OnlyMyOffice, &owner, &same));
        assert!(!passes_office_filter(OfficeFilter::OnlyMyOffice, &owner, &other));
        assert!(!passes_office_filter(OfficeFilter::ExcludeMyOffice, &owner, &same));
        assert!(passes_office_filter(OfficeFilter::ExcludeMyOffice, &owner, &other));
        assert!(passes_office_filter(OfficeFilter::None, &owner, &same));
    }

    #[test]
    fn test_skill_filter_is_any_of() {
        let candidate = profile("dev", "tokyo", &["skill2", "skill9"]);
        let wanted = vec!["skill2".to_string(), "skill3".to_string()];
        let missing = vec!["skill4".to_string()];

        assert!(passes_skill_filter(&wanted, &candidate));
        assert!(!passes_skill_filter(&missing, &candidate));
        assert!(passes_skill_filter(&[], &candidate));
        assert!(passes_skill_filter(&[], &profile("dev", "tokyo", &[])));
    }

    #[test]
    fn test_never_matched_filter() {
        let candidate = profile("dev", "tokyo", &[]);
        let mut seen = HashSet::new();
        assert!(passes_never_matched_filter(Some(&seen), &candidate));
        seen.insert(candidate.member_id);
        assert!(!passes_never_matched_filter(Some(&seen), &candidate));
        assert!(passes_never_matched_filter(None, &candidate));
    }

    #[test]
    fn test_evaluate_reports_first_failing_gate() {
        let owner = profile("sales", "tokyo", &[]);
        let mut cfg = config(&owner);
        cfg.department_filter = DepartmentFilter::OnlyMyDepartment;
        cfg.office_filter = OfficeFilter::OnlyMyOffice;
        cfg.skill_filter = vec!["rust".to_string()];

        let filter = AdmissionFilter::new(&cfg, &owner, None);

        let wrong_everything = profile("dev", "osaka", &[]);
        assert_eq!(
            filter.evaluate(&wrong_everything, &[owner.member_id]),
            Admission::Reject(Rejection::Department)
        );

        let wrong_office = profile("sales", "osaka", &["rust"]);
        assert_eq!(
            filter.evaluate(&wrong_office, &[owner.member_id]),
            Admission::Reject(Rejection::Office)
        );

        let no_skill = profile("sales", "tokyo", &["go"]);
        assert_eq!(
            filter.evaluate(&no_skill, &[owner.member_id]),
            Admission::Reject(Rejection::Skill)
        );

        let good = profile("sales", "tokyo", &["rust"]);
        assert_eq!(filter.evaluate(&good, &[owner.member_id]), Admission::Admit);
        assert_eq!(
            filter.evaluate(&good, &[owner.member_id, good.member_id]),
            Admission::Reject(Rejection::Duplicate)
        );
    }

    #[test]
    fn test_owner_drawn_as_candidate_is_a_duplicate() {
        let owner = profile("sales", "tokyo", &[]);
        let cfg = config(&owner);
        let filter = AdmissionFilter::new(&cfg, &owner, None);
        assert_eq!(
            filter.evaluate(&owner, &[owner.member_id]),
            Admission::Reject(Rejection::Duplicate)
        );
    }

    #[test]
    fn test_evaluate_never_matched() {
        let owner = profile("sales", "tokyo", &[]);
        let mut cfg = config(&owner);
        cfg.never_matched_filter = true;
        let matched_before = profile("dev", "tokyo", &[]);
        let ever: HashSet<MemberId> = [matched_before.member_id].into_iter().collect();
        let filter = AdmissionFilter::new(&cfg, &owner, Some(&ever));

        assert_eq!(
            filter.evaluate(&matched_before, &[owner.member_id]),
            Admission::Reject(Rejection::NeverMatched)
        );
        assert_eq!(
            filter.evaluate(&profile("dev", "tokyo", &[]), &[owner.member_id]),
            Admission::Admit
        );
    }
}
