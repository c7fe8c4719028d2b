// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the Huddle CLI

pub mod config;
pub mod group;

pub use self::config::ConfigCommand;
pub use self::group::GroupCommand;

/// Server contacted by client commands when `--host` is not given.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Server port contacted by client commands when `--port` is not given.
pub const DEFAULT_PORT: u16 = 8080;
