// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # `huddle-core`
//!
//! Domain, application, infrastructure and presentation layers of the Huddle
//! match-group service.
//!
//! | Module | Layer | Contents |
//! |--------|-------|----------|
//! | [`domain`] | Domain | Members, match groups, admission filters, repository traits |
//! | [`application`] | Application | `GroupSampler`, `MatchGroupService`, repository factory |
//! | [`infrastructure`] | Infrastructure | In-memory and PostgreSQL directories, connection pool |
//! | [`presentation`] | Presentation | Axum HTTP API |

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
