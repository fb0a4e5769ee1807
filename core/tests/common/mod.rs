// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - Shift and configuration factories (fixtures)
//! - A fake remote that records submissions
//! - Temporary directory management with auto-cleanup

mod fixtures;
mod temp_dir;

#[allow(unused_imports)]
pub use fixtures::{Harness, MONTH, STATION, ShiftBuilder, YEAR, test_config};
#[allow(unused_imports)]
pub use planner::{FakePlanner, Scripted};
#[allow(unused_imports)]
pub use temp_dir::TempState;
