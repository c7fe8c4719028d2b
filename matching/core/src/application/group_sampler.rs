// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Group Sampler
//!
//! Assembles the member list of a new match group by drawing random
//! candidates from the [`MemberDirectory`] and admitting those that pass every
//! active [`AdmissionFilter`] gate.
//!
//! # Flow
//!
//! 1. Fetch the owner's profile (not counted against the deadline)
//! 2. Resolve the owner's ever-matched set once, if that filter is on
//! 3. Start the clock with the owner as the only accepted member
//! 4. Until the target size is reached: check the deadline, draw a candidate,
//!    admit it or silently discard it
//! 5. Return an `open` [`MatchGroup`]; the caller persists it
//!
//! The deadline is cooperative. It is checked at the top of every iteration,
//! so a single slow directory call is never interrupted, only the next check
//! sees the overrun. The loop yields to the runtime after every draw, so
//! dropping the returned future stops it even when the directory answers
//! without suspending.
//!
//! A timeout is a total failure: no partial group is returned and nothing is
//! written.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::domain::filters::{Admission, AdmissionFilter};
use crate::domain::match_group::{MatchGroup, MatchGroupConfig};
use crate::domain::member::{MemberId, MemberProfile};
use crate::domain::repository::{MemberDirectory, RepositoryError};
use crate::domain::server_config::DEFAULT_MATCH_TIMEOUT_MS;

#[derive(Debug, Error)]
pub enum SamplingError {
    #[error("owner {0} not found in directory")]
    OwnerNotFound(MemberId),

    #[error("only {accepted} of {target} members found before the {timeout:?} deadline")]
    Timeout {
        accepted: usize,
        target: usize,
        timeout: Duration,
    },

    #[error("directory error: {0}")]
    Directory(#[from] RepositoryError),
}

pub struct GroupSampler {
    directory: Arc<dyn MemberDirectory>,
    default_timeout: Duration,
}

impl GroupSampler {
    pub fn new(directory: Arc<dyn MemberDirectory>) -> Self {
        Self::with_default_timeout(directory, Duration::from_millis(DEFAULT_MATCH_TIMEOUT_MS))
    }

    pub fn with_default_timeout(directory: Arc<dyn MemberDirectory>, default_timeout: Duration) -> Self {
        Self {
            directory,
            default_timeout,
        }
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Draw members for `config` until the group is full or `timeout`
    /// (default: the sampler's configured timeout) has elapsed.
    pub async fn sample(
        &self,
        config: &MatchGroupConfig,
        timeout: Option<Duration>,
    ) -> Result<MatchGroup, SamplingError> {
        let timeout = timeout.unwrap_or(self.default_timeout);
        let target = config.target_size();

        let owner: MemberProfile = self
            .directory
            .get_member_profile(config.owner_id)
            .await?
            .ok_or(SamplingError::OwnerNotFound(config.owner_id))?;

        let ever_matched: Option<HashSet<MemberId>> = if config.never_matched_filter {
            Some(self.directory.get_co_members_ever_matched(owner.member_id).await?)
        } else {
            None
        };
        let filter = AdmissionFilter::new(config, &owner, ever_matched.as_ref());

        let mut accepted: Vec<MemberId> = Vec::with_capacity(target);
        accepted.push(owner.member_id);

        let started = Instant::now();
        let mut draws: u64 = 0;

        while accepted.len() < target {
            if started.elapsed() > timeout {
                error!(
                    owner_id = %owner.member_id,
                    accepted = accepted.len(),
                    target,
                    draws,
                    "Not all members found before timeout"
                );
                return Err(SamplingError::Timeout {
                    accepted: accepted.len(),
                    target,
                    timeout,
                });
            }

            let candidate = self.directory.get_random_member_profile().await?;
            draws += 1;

            match filter.evaluate(&candidate, &accepted) {
                Admission::Admit => {
                    debug!(candidate_id = %candidate.member_id, "Candidate added to members");
                    accepted.push(candidate.member_id);
                }
                Admission::Reject(reason) => {
                    debug!(
                        candidate_id = %candidate.member_id,
                        reason = reason.as_str(),
                        "Candidate rejected"
                    );
                }
            }

            // an in-memory directory never returns Pending
            tokio::task::yield_now().await;
        }

        info!(
            owner_id = %owner.member_id,
            members = accepted.len(),
            draws,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Match group members sampled"
        );

        Ok(MatchGroup::open(config, accepted))
    }
}
