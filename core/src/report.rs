// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use shiftsync_remote::ShiftId;

use crate::error::{ErrorKind, SyncError};
use crate::types::LogicalShiftKey;

/// What happened to one logical key during a cycle.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum UnitAction {
    /// A new remote shift was created.
    Created,
    /// The remote shift was sent again with the current roster.
    Updated,
    /// The remote state already matched; nothing was sent.
    Unchanged,
    /// Every assignment was removed from the remote shift.
    Cleared,
    /// Nothing to send.
    Skipped { reason: String },
    /// A record without snapshot prevented any action.
    GuardSkipped { reason: String },
    /// Sending failed.
    Failed { kind: ErrorKind, message: String },
    /// Clearing failed; retried next cycle.
    ClearFailed { kind: ErrorKind, message: String },
}

impl UnitAction {
    pub(crate) fn failed(e: &SyncError) -> Self {
        Self::Failed {
            kind: e.kind(),
            message: e.to_string(),
        }
    }

    pub(crate) fn clear_failed(e: &SyncError) -> Self {
        Self::ClearFailed {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

/// Outcome of one key.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UnitReport {
    /// The key, unknown for legacy records.
    pub key: Option<LogicalShiftKey>,
    pub local_shift_ids: Vec<i64>,
    pub assignee_ids: Vec<i64>,
    pub remote_id: Option<ShiftId>,
    pub warnings: Vec<String>,
    #[serde(flatten)]
    pub action: UnitAction,
}

/// Aggregated outcome of a cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SyncSummary {
    /// Units created or updated remotely.
    pub synced: usize,
    /// Units that failed to send.
    pub errors: usize,
    /// Units left alone: unchanged or nothing to send.
    pub skipped: usize,
    /// Of `synced`, the ones that updated an existing remote shift.
    pub updated: usize,
    /// Remote shifts cleared.
    pub deleted: usize,
    /// Remote shifts that failed to clear.
    pub delete_errors: usize,
    /// Legacy records that blocked reconciliation.
    pub guarded: usize,
    /// The cycle stopped before every key was handled.
    pub cancelled: bool,
    pub units: Vec<UnitReport>,
}

impl SyncSummary {
    pub(crate) fn record(&mut self, report: UnitReport) {
        match report.action {
            UnitAction::Created => self.synced += 1,
            UnitAction::Updated => {
                self.synced += 1;
                self.updated += 1;
            }
            UnitAction::Unchanged | UnitAction::Skipped { .. } => self.skipped += 1,
            UnitAction::Cleared => self.deleted += 1,
            UnitAction::ClearFailed { .. } => self.delete_errors += 1,
            UnitAction::Failed { .. } => self.errors += 1,
            UnitAction::GuardSkipped { .. } => self.guarded += 1,
        }
        self.units.push(report);
    }

    /// Returns true if no unit failed.
    pub fn is_success(&self) -> bool {
        self.errors == 0 && self.delete_errors == 0
    }
}

/// Outcome of [`cleanup_legacy`](crate::ShiftSync::cleanup_legacy).
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct LegacyCleanup {
    pub deleted: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}
