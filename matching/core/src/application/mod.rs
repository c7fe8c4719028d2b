// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod group_sampler;
pub mod match_group_service;
pub mod repository_factory;

// Re-export use cases for convenience
pub use group_sampler::{GroupSampler, SamplingError};
pub use match_group_service::{MatchGroupError, MatchGroupService, StandardMatchGroupService};
