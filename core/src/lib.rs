// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Synchronization of a local shift roster with an external scheduling system.

mod adapter;
mod config;
mod context;
mod error;
mod grouper;
mod legacy;
mod localdb;
mod reconciler;
mod report;
mod shift_sync;
mod types;

pub use crate::adapter::{
    HttpShiftPlanner, MAX_POSITIONS, RemoteAdapter, RemoteOutcome, ShiftPlanner, StationConfig,
};
pub use crate::config::{APP_NAME, Config, RemoteDefaults, default_database_path, expand_path};
pub use crate::context::{CancelToken, SyncContext, SyncProgress};
pub use crate::error::{ErrorKind, SyncError};
pub use crate::grouper::{AssignmentUnit, group_rows};
pub use crate::localdb::{
    Identities, LocalDb, PendingClear, PersistOutcome, PositionMappings, PositionSlot, Shifts,
    StationRecord, Stations, SyncRecord, SyncRecords, SyncStatus, UserMappings,
};
pub use crate::report::{LegacyCleanup, SyncSummary, UnitAction, UnitReport};
pub use crate::shift_sync::ShiftSync;
pub use crate::types::{
    LogicalShiftKey, MonthScope, NewShift, STATUS_PLANNED, ShiftRow, ShiftSnapshot,
};
