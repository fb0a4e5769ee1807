// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use jiff::Timestamp;
use jiff::civil::Date;

use crate::error::SyncError;

/// Status value of a shift row that is ready to be synchronized.
pub const STATUS_PLANNED: &str = "planned";

/// Calendar month a sync cycle covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MonthScope {
    /// The year, e.g. 2024.
    pub year: i16,
    /// The month, 1 to 12.
    pub month: i8,
}

impl MonthScope {
    /// Creates a scope, validating the month.
    pub fn new(year: i16, month: i8) -> Result<Self, SyncError> {
        Date::new(year, month, 1)
            .map_err(|e| SyncError::Configuration(format!("invalid month {year}-{month}: {e}")))?;
        Ok(Self { year, month })
    }

    /// First day of the month.
    pub fn first_day(&self) -> Date {
        jiff::civil::date(self.year, self.month, 1)
    }

    /// First day of the following month, the exclusive upper bound.
    pub fn next_first_day(&self) -> Date {
        if self.month == 12 {
            jiff::civil::date(self.year + 1, 1, 1)
        } else {
            jiff::civil::date(self.year, self.month + 1, 1)
        }
    }

    /// Returns true if the date falls inside the month.
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for MonthScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Identity of a remote shift slot, independent of local row ids.
///
/// Rows deleted and regenerated for the same real-world half or full shift
/// produce the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct LogicalShiftKey {
    /// Station the slot belongs to.
    pub station_id: i64,
    /// Calendar date of the shift.
    pub date: Date,
    /// Shift kind, e.g. `day` or `night`.
    pub kind: String,
    /// Start of the split interval, for split shifts.
    pub split_start: Option<Timestamp>,
    /// End of the split interval, for split shifts.
    pub split_end: Option<Timestamp>,
}

impl fmt::Display for LogicalShiftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "station {} {} {}", self.station_id, self.date, self.kind)?;
        match (self.split_start, self.split_end) {
            (Some(start), Some(end)) => write!(f, " [{start}..{end}]"),
            (Some(start), None) => write!(f, " [{start}..]"),
            (None, Some(end)) => write!(f, " [..{end}]"),
            (None, None) => Ok(()),
        }
    }
}

/// A local single-person shift row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftRow {
    /// Local primary key.
    pub id: i64,
    /// Station the shift belongs to.
    pub station_id: i64,
    /// Assigned user, `0` when the shift is open.
    pub user_id: i64,
    /// Calendar date of the shift.
    pub date: Date,
    /// Start of the shift window.
    pub start: Timestamp,
    /// End of the shift window.
    pub end: Timestamp,
    /// Shift kind.
    pub kind: String,
    /// Row status, see [`STATUS_PLANNED`].
    pub status: String,
    /// Whether this row is one half of a split shift.
    pub is_split: bool,
    /// Group shared by the halves of a split shift.
    pub split_group_id: Option<i64>,
    /// Start of the split interval.
    pub split_start: Option<Timestamp>,
    /// End of the split interval.
    pub split_end: Option<Timestamp>,
}

impl ShiftRow {
    /// Returns true if a user is assigned.
    pub fn is_assigned(&self) -> bool {
        self.user_id > 0
    }

    /// The logical key of the remote slot this row fills.
    pub fn key(&self) -> LogicalShiftKey {
        ShiftSnapshot::of(self).key(self.station_id)
    }
}

/// A shift row to insert, see [`Shifts::insert`](crate::Shifts::insert).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShift {
    /// Station the shift belongs to.
    pub station_id: i64,
    /// Assigned user, `0` when open.
    pub user_id: i64,
    /// Calendar date.
    pub date: Date,
    /// Start of the shift window.
    pub start: Timestamp,
    /// End of the shift window.
    pub end: Timestamp,
    /// Shift kind.
    pub kind: String,
    /// Row status.
    pub status: String,
    /// Whether this row is one half of a split shift.
    pub is_split: bool,
    /// Split group.
    pub split_group_id: Option<i64>,
    /// Start of the split interval.
    pub split_start: Option<Timestamp>,
    /// End of the split interval.
    pub split_end: Option<Timestamp>,
}

/// Shift metadata captured at the time of a sync attempt.
///
/// Kept on each sync record so the previous remote state can be evaluated
/// after the local row is gone.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSnapshot {
    /// Calendar date of the shift.
    pub date: Date,
    /// Start of the shift window.
    pub start: Timestamp,
    /// End of the shift window.
    pub end: Timestamp,
    /// Shift kind.
    pub kind: String,
    /// Whether the row was one half of a split shift.
    pub is_split: bool,
    /// Split group.
    #[serde(default)]
    pub split_group_id: Option<i64>,
    /// Start of the split interval.
    #[serde(default)]
    pub split_start: Option<Timestamp>,
    /// End of the split interval.
    #[serde(default)]
    pub split_end: Option<Timestamp>,
}

impl ShiftSnapshot {
    /// Captures the metadata of a row.
    pub fn of(row: &ShiftRow) -> Self {
        Self {
            date: row.date,
            start: row.start,
            end: row.end,
            kind: row.kind.clone(),
            is_split: row.is_split,
            split_group_id: row.split_group_id,
            split_start: row.split_start,
            split_end: row.split_end,
        }
    }

    /// The logical key this snapshot describes.
    pub fn key(&self, station_id: i64) -> LogicalShiftKey {
        LogicalShiftKey {
            station_id,
            date: self.date,
            kind: self.kind.clone(),
            split_start: self.split_start,
            split_end: self.split_end,
        }
    }
}
