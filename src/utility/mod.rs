// grit: Git checkout manager with a self-update engine
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! fs
//!   PartialFileGuard   remove-on-drop for staged and partial files
//!   probe_writable()   directory write check
//! ```

pub mod fs;
