// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!        Public API
//!   query.rs  cmd.rs  ops.rs
//!        \      |      /
//!         v     v     v
//!      ,------------------,
//!      | backend (traits) |
//!      '--+----------+----'
//!         |          |
//!         v          v
//!    GitQuery    GitMutation
//!   (gix, read)  (CLI, write)
//!         |          |
//!         v          v
//!    GixBackend  ShellBackend
//!    .is_repo    .clone
//!    .branch     .set_config
//!                .remote_exists
//! ```
//!
//! **`GixBackend`**: pure Rust, no subprocess, read-only.
//! **`ShellBackend`**: git CLI, so credential helpers and SSH config apply.

pub mod backend;
pub mod cmd;
pub mod ops;
pub mod query;
