// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Match group commands
//!
//! Commands: create, list. Both talk to a running server over HTTP.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use huddle_core::domain::match_group::{MatchGroupDetail, MatchGroupStatus, MatchGroupSummary};
use huddle_core::domain::member::MemberId;
use huddle_core::presentation::api::CreateMatchGroupRequest;

use crate::client::HuddleClient;

#[derive(Subcommand)]
pub enum GroupCommand {
    /// Create a match group on behalf of a member
    Create {
        /// Member id of the group owner
        #[arg(long, value_name = "UUID")]
        owner: String,

        /// Group name (1-50 characters)
        #[arg(long)]
        name: String,

        /// Group description (up to 120 characters)
        #[arg(long, default_value = "")]
        description: String,

        /// Target group size, owner included (2-8)
        #[arg(long, default_value_t = 2)]
        members: i64,

        /// Department filter
        #[arg(
            long,
            default_value = "none",
            value_parser = ["onlyMyDepartment", "excludeMyDepartment", "none"]
        )]
        department: String,

        /// Office filter
        #[arg(
            long,
            default_value = "none",
            value_parser = ["onlyMyOffice", "excludeMyOffice", "none"]
        )]
        office: String,

        /// Admit candidates having any of these skills (repeatable)
        #[arg(long = "skill", value_name = "SKILL")]
        skills: Vec<String>,

        /// Exclude members who have already shared a group with the owner
        #[arg(long)]
        never_matched: bool,

        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// List the match groups a member belongs to
    List {
        /// Member id
        #[arg(value_name = "UUID")]
        member: String,

        /// Only open groups
        #[arg(long)]
        open: bool,

        #[arg(long, default_value_t = 20)]
        limit: u32,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
}

pub async fn handle_command(command: GroupCommand, host: &str, port: u16) -> Result<()> {
    let client = HuddleClient::new(host, port)?;

    match command {
        GroupCommand::Create {
            owner,
            name,
            description,
            members,
            department,
            office,
            skills,
            never_matched,
            json,
        } => {
            let owner = parse_member_id(&owner)?;
            let request = CreateMatchGroupRequest {
                match_group_name: name,
                description,
                num_of_members: members,
                department_filter: department,
                office_filter: office,
                skill_filter: skills,
                never_matched_filter: never_matched,
            };
            create(&client, owner, &request, json).await
        }
        GroupCommand::List {
            member,
            open,
            limit,
            offset,
        } => {
            let member = parse_member_id(&member)?;
            let status = if open { "open" } else { "all" };
            list(&client, member, status, limit, offset).await
        }
    }
}

fn parse_member_id(raw: &str) -> Result<MemberId> {
    MemberId::from_string(raw).with_context(|| format!("'{}' is not a valid member id", raw))
}

async fn create(
    client: &HuddleClient,
    owner: MemberId,
    request: &CreateMatchGroupRequest,
    json: bool,
) -> Result<()> {
    println!(
        "Creating match group '{}' ({} members)...",
        request.match_group_name, request.num_of_members
    );

    let detail = client.create_match_group(owner, request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        print_detail(&detail);
    }

    Ok(())
}

async fn list(
    client: &HuddleClient,
    member: MemberId,
    status: &str,
    limit: u32,
    offset: u32,
) -> Result<()> {
    let groups = client
        .list_member_match_groups(member, status, limit, offset)
        .await?;

    if groups.is_empty() {
        println!("{}", "No match groups found".dimmed());
        return Ok(());
    }

    for group in &groups {
        print_summary(group);
    }

    Ok(())
}

fn status_label(status: MatchGroupStatus) -> colored::ColoredString {
    match status {
        MatchGroupStatus::Open => status.as_str().green(),
        MatchGroupStatus::Close => status.as_str().dimmed(),
    }
}

fn print_detail(detail: &MatchGroupDetail) {
    println!(
        "{}",
        format!("✓ Match group created: {}", detail.match_group_id).green()
    );
    println!("  Name: {}", detail.match_group_name.bold());
    if !detail.description.is_empty() {
        println!("  Description: {}", detail.description);
    }
    println!("  Status: {}", status_label(detail.status));
    println!("  Created: {}", detail.created_at);
    println!("  Members:");
    for member in &detail.members {
        println!(
            "    - {} ({}) {}",
            member.member_name,
            member.office_name,
            member.member_id.to_string().dimmed()
        );
    }
}

fn print_summary(group: &MatchGroupSummary) {
    let names: Vec<&str> = group
        .members
        .iter()
        .map(|m| m.member_name.as_str())
        .collect();
    println!(
        "{} [{}] {} - {}",
        group.match_group_name.bold(),
        status_label(group.status),
        group.created_at,
        names.join(", ")
    );
}
