// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Reconciliation tests for the shiftsync-core crate.

mod cycle;
mod guard;
mod roster;
