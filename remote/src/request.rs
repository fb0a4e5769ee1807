// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Request body of the `ShiftPlanning` hook.

use jiff::Timestamp;

use crate::types::{PersonId, PositionId, SheetId, ShiftId};

/// One person placed in one position slot.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ShiftAssignment {
    /// Position slot id.
    pub position: PositionId,
    /// Person id.
    pub person: PersonId,
}

/// Submission of a single shift object.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftPlanningRequest {
    /// Shift sheet the object belongs to.
    pub shift_sheet: SheetId,
    /// Existing remote shift; absent when creating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<ShiftId>,
    /// Start of the shift window.
    pub start: Timestamp,
    /// End of the shift window.
    pub end: Timestamp,
    /// Ordered assignments; empty clears the object.
    pub assignments: Vec<ShiftAssignment>,
}

impl ShiftPlanningRequest {
    /// Returns true if this submission targets an existing remote object.
    #[must_use]
    pub fn is_update(&self) -> bool {
        self.shift.is_some()
    }

    /// Returns true if this submission removes every assignment.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.shift.is_some() && self.assignments.is_empty()
    }
}
