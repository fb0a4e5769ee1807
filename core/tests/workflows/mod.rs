// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end workflow tests for the shiftsync-core crate.
//!
//! These tests run the engine against a database file and a mock HTTP
//! remote, the way the command line uses it.

mod file_database;
mod http_remote;
