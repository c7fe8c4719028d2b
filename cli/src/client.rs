// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! HTTP client for communicating with a running Huddle server

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

use huddle_core::domain::match_group::{MatchGroupDetail, MatchGroupSummary};
use huddle_core::domain::member::MemberId;
use huddle_core::presentation::api::{CreateMatchGroupRequest, MEMBER_ID_HEADER};

#[derive(Debug, Clone)]
pub struct HuddleClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl HuddleClient {
    pub fn new(host: &str, port: u16) -> Result<Self> {
        Self::with_base_url(format!("http://{}:{}", host, port))
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        // Sampling may run for the full server-side deadline before answering.
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn create_match_group(
        &self,
        owner: MemberId,
        request: &CreateMatchGroupRequest,
    ) -> Result<MatchGroupDetail> {
        let response = self
            .client
            .post(format!("{}/api/v1/match-groups", self.base_url))
            .header(MEMBER_ID_HEADER, owner.to_string())
            .json(request)
            .send()
            .await
            .context("Failed to send match group request")?;

        let response = ensure_success(response, "Failed to create match group").await?;
        response
            .json()
            .await
            .context("Failed to parse match group response")
    }

    pub async fn list_member_match_groups(
        &self,
        member: MemberId,
        status: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<MatchGroupSummary>> {
        let response = self
            .client
            .get(format!(
                "{}/api/v1/match-groups/members/{}?status={}&limit={}&offset={}",
                self.base_url, member, status, limit, offset
            ))
            .send()
            .await
            .context("Failed to list match groups")?;

        let response = ensure_success(response, "Failed to list match groups").await?;
        response
            .json()
            .await
            .context("Failed to parse match group list")
    }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn ensure_success(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.message)
        .unwrap_or(text);
    anyhow::bail!("{} ({}): {}", what, status, message)
}
