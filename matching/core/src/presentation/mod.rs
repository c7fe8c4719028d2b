// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Presentation Layer (`huddle-core`)
//!
//! HTTP surface that translates external requests into application service
//! calls. Validation of request *shape* happens here; every business rule is
//! delegated to `crate::application`.
//!
//! | Module | Transport | Description |
//! |--------|-----------|-------------|
//! | [`api`] | HTTP (Axum) | Match-group creation and listing, health probe |

pub mod api;
