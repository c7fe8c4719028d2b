// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! Members, match groups, admission filters and the persistence contracts
//! the use cases depend on.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Entities, value objects and repository traits; no I/O

pub mod member;
pub mod match_group;
pub mod filters;
pub mod repository;
pub mod server_config;
