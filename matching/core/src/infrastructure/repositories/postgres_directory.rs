// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # PostgreSQL Member Directory
//!
//! Production `MemberDirectory` and `SkillRegistry` implementation backed by
//! the schema in `migrations/0001_member_directory.sql` via `sqlx`.
//!
//! Random candidates are picked with `ORDER BY random() LIMIT 1`, i.e.
//! uniformly and with replacement across the whole `members` table. Group and
//! membership rows are written inside one transaction so concurrent creations
//! never observe a half-written group.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use std::collections::HashSet;
use uuid::Uuid;

use crate::domain::match_group::{MatchGroup, MatchGroupDetail, MatchGroupId, MatchGroupStatus, format_created_date};
use crate::domain::member::{MemberIcon, MemberId, MemberProfile, MemberSummary};
use crate::domain::repository::{MemberDirectory, RepositoryError, SkillRegistry};

const PROFILE_SELECT: &str = r#"
    SELECT
        m.member_id, m.member_name, m.icon_file_id, f.file_name,
        o.office_name, d.department_name,
        COALESCE(
            array_agg(s.skill_name ORDER BY s.skill_name) FILTER (WHERE s.skill_name IS NOT NULL),
            '{}'::text[]
        ) AS skill_names
    FROM members m
    JOIN files f ON f.file_id = m.icon_file_id
    JOIN offices o ON o.office_id = m.office_id
    JOIN departments d ON d.department_id = m.department_id
    LEFT JOIN member_skills ms ON ms.member_id = m.member_id
    LEFT JOIN skills s ON s.skill_id = ms.skill_id
"#;

const PROFILE_GROUP_BY: &str =
    "GROUP BY m.member_id, m.member_name, m.icon_file_id, f.file_name, o.office_name, d.department_name";

pub struct PostgresMemberDirectory {
    pool: PgPool,
}

impl PostgresMemberDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn profile_from_row(row: &PgRow) -> Result<MemberProfile, RepositoryError> {
    Ok(MemberProfile {
        member_id: MemberId(row.try_get("member_id")?),
        member_name: row.try_get("member_name")?,
        icon: MemberIcon {
            file_id: row.try_get("icon_file_id")?,
            file_name: row.try_get("file_name")?,
        },
        office_name: row.try_get("office_name")?,
        department_name: row.try_get("department_name")?,
        skill_names: row.try_get("skill_names")?,
    })
}

fn summary_from_row(row: &PgRow) -> Result<MemberSummary, RepositoryError> {
    Ok(MemberSummary {
        member_id: MemberId(row.try_get("member_id")?),
        member_name: row.try_get("member_name")?,
        icon: MemberIcon {
            file_id: row.try_get("icon_file_id")?,
            file_name: row.try_get("file_name")?,
        },
        office_name: row.try_get("office_name")?,
    })
}

#[async_trait]
impl MemberDirectory for PostgresMemberDirectory {
    async fn get_member_profile(&self, id: MemberId) -> Result<Option<MemberProfile>, RepositoryError> {
        let sql = format!("{PROFILE_SELECT} WHERE m.member_id = $1 {PROFILE_GROUP_BY}");
        let row = sqlx::query(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to load member profile: {}", e)))?;

        row.as_ref().map(profile_from_row).transpose()
    }

    async fn get_random_member_profile(&self) -> Result<MemberProfile, RepositoryError> {
        let sql = format!(
            "{PROFILE_SELECT} WHERE m.member_id = (SELECT member_id FROM members ORDER BY random() LIMIT 1) {PROFILE_GROUP_BY}"
        );
        let row = sqlx::query(&sql)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to draw random member: {}", e)))?
            .ok_or_else(|| RepositoryError::NotFound("member directory is empty".to_string()))?;

        profile_from_row(&row)
    }

    async fn get_co_members_ever_matched(&self, id: MemberId) -> Result<HashSet<MemberId>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT other.member_id
            FROM match_group_members mine
            JOIN match_group_members other ON other.match_group_id = mine.match_group_id
            WHERE mine.member_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter()
            .map(|row| -> Result<MemberId, RepositoryError> {
                Ok(MemberId(row.try_get::<Uuid, _>("member_id")?))
            })
            .collect()
    }

    async fn persist_group(&self, group: &MatchGroup) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO match_groups (
                match_group_id, match_group_name, description, status, created_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(group.id.0)
        .bind(&group.name)
        .bind(&group.description)
        .bind(group.status.as_str())
        .bind(group.created_by.0)
        .bind(group.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to save match group: {}", e)))?;

        for (position, member) in group.members.iter().enumerate() {
            sqlx::query(
                "INSERT INTO match_group_members (match_group_id, member_id, position) VALUES ($1, $2, $3)",
            )
            .bind(group.id.0)
            .bind(member.0)
            .bind(position as i16)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to save match group member: {}", e)))?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_group_detail(&self, id: MatchGroupId) -> Result<Option<MatchGroupDetail>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT match_group_id, match_group_name, description, status, created_by, created_at
            FROM match_groups
            WHERE match_group_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let status_str: String = row.try_get("status")?;
        let status = MatchGroupStatus::parse(&status_str).ok_or_else(|| {
            RepositoryError::Serialization(format!("unknown match group status '{}'", status_str))
        })?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;

        let member_rows = sqlx::query(
            r#"
            SELECT m.member_id, m.member_name, m.icon_file_id, f.file_name, o.office_name
            FROM match_group_members gm
            JOIN members m ON m.member_id = gm.member_id
            JOIN files f ON f.file_id = m.icon_file_id
            JOIN offices o ON o.office_id = m.office_id
            WHERE gm.match_group_id = $1
            ORDER BY gm.position ASC
            "#,
        )
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let members = member_rows
            .iter()
            .map(summary_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(MatchGroupDetail {
            match_group_id: MatchGroupId(row.try_get("match_group_id")?),
            match_group_name: row.try_get("match_group_name")?,
            description: row.try_get("description")?,
            members,
            status,
            created_by: MemberId(row.try_get("created_by")?),
            created_at: format_created_date(&created_at),
        }))
    }

    async fn get_group_ids_by_member(&self, id: MemberId) -> Result<Vec<MatchGroupId>, RepositoryError> {
        let rows = sqlx::query("SELECT match_group_id FROM match_group_members WHERE member_id = $1")
            .bind(id.0)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter()
            .map(|row| -> Result<MatchGroupId, RepositoryError> {
                Ok(MatchGroupId(row.try_get::<Uuid, _>("match_group_id")?))
            })
            .collect()
    }
}

#[async_trait]
impl SkillRegistry for PostgresMemberDirectory {
    async fn has_skill(&self, name: &str) -> Result<bool, RepositoryError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM skills WHERE skill_name = $1)")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;
        Ok(exists)
    }
}
