// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Grouping of single-person shift rows into remote shift objects.

use std::collections::BTreeMap;

use jiff::Timestamp;

use crate::types::{LogicalShiftKey, ShiftRow};

/// Rows sharing start, end and kind, sent as one remote shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentUnit {
    /// Logical key, taken from the lowest row id of the group.
    pub key: LogicalShiftKey,
    pub start: Timestamp,
    pub end: Timestamp,
    pub kind: String,
    /// Assigned users ordered by row id; index `n` fills remote slot `n + 1`.
    pub assignee_ids: Vec<i64>,
    /// Ids of every row in the group, ordered.
    pub source_row_ids: Vec<i64>,
    /// The assigned rows, in slot order.
    pub rows: Vec<ShiftRow>,
    /// Rows of the group without a user.
    pub unassigned_row_ids: Vec<i64>,
}

impl AssignmentUnit {
    /// Returns true if no row of the group is assigned.
    pub fn is_empty(&self) -> bool {
        self.assignee_ids.is_empty()
    }
}

/// Groups rows by `(start, end, kind)`.
///
/// Units are returned in window order. Open rows (`user_id == 0`) stay part
/// of the group but not of the roster.
pub fn group_rows(rows: Vec<ShiftRow>) -> Vec<AssignmentUnit> {
    let mut groups: BTreeMap<(Timestamp, Timestamp, String), Vec<ShiftRow>> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.start, row.end, row.kind.clone()))
            .or_default()
            .push(row);
    }

    groups
        .into_iter()
        .filter_map(|((start, end, kind), mut rows)| {
            rows.sort_by_key(|r| r.id);
            let key = rows.first()?.key();

            let source_row_ids = rows.iter().map(|r| r.id).collect();
            let (assigned, open): (Vec<_>, Vec<_>) = rows.into_iter().partition(|r| r.is_assigned());

            Some(AssignmentUnit {
                key,
                start,
                end,
                kind,
                assignee_ids: assigned.iter().map(|r| r.user_id).collect(),
                source_row_ids,
                rows: assigned,
                unassigned_row_ids: open.iter().map(|r| r.id).collect(),
            })
        })
        .collect()
}
