// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end for pushing the local shift roster to the remote
//! scheduling system.

mod arg;
mod cli;
mod cmd_generate_completion;
mod cmd_legacy;
mod cmd_status;
mod cmd_sync;
mod cmd_test_connection;
mod config;
mod record_formatter;
mod table;
mod unit_formatter;
mod util;

pub use crate::cli::{Cli, Commands, run};
