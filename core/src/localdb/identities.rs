// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use jiff::Timestamp;
use shiftsync_remote::ShiftId;
use sqlx::SqlitePool;

use crate::localdb::{format_date, format_ts, parse_date, parse_opt_ts, parse_ts};
use crate::types::LogicalShiftKey;

/// Result of [`Identities::persist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The key had no entry.
    Inserted,
    /// The key already mapped to the same id.
    Unchanged,
    /// The key mapped to another id, which has been replaced.
    Replaced { previous: ShiftId },
}

/// A key whose remote shift still carries assignees after a failed clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClear {
    pub key: LogicalShiftKey,
    pub remote_id: ShiftId,
    /// Window sent with the clear.
    pub start: Timestamp,
    pub end: Timestamp,
    pub error_message: Option<String>,
}

/// Identity registry: the permanent remote shift id of each logical slot.
///
/// Entries are never deleted by the synchronization.
#[derive(Debug, Clone)]
pub struct Identities {
    pool: SqlitePool,
}

impl Identities {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Looks up the remote id of a key, matching all five components exactly.
    pub async fn resolve(&self, key: &LogicalShiftKey) -> Result<Option<ShiftId>, sqlx::Error> {
        const SQL: &str = "\
SELECT remote_shift_id
FROM remote_shift_identities
WHERE station_id = ? AND shift_date = ? AND kind = ? AND split_start = ? AND split_end = ?;
";

        let (start, end) = split_columns(key);
        let row: Option<(String,)> = sqlx::query_as(SQL)
            .bind(key.station_id)
            .bind(format_date(key.date))
            .bind(&key.kind)
            .bind(start)
            .bind(end)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(id,)| ShiftId::from(id)))
    }

    /// Records the remote id of a key. A different id replaces the old one.
    pub async fn persist(
        &self,
        key: &LogicalShiftKey,
        remote_id: &ShiftId,
    ) -> Result<PersistOutcome, sqlx::Error> {
        const SQL: &str = "\
INSERT INTO remote_shift_identities
    (station_id, shift_date, kind, split_start, split_end, remote_shift_id, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT(station_id, shift_date, kind, split_start, split_end) DO UPDATE SET
    remote_shift_id = excluded.remote_shift_id,
    updated_at      = excluded.updated_at;
";

        let outcome = match self.resolve(key).await? {
            None => PersistOutcome::Inserted,
            Some(existing) if existing == *remote_id => return Ok(PersistOutcome::Unchanged),
            Some(previous) => {
                tracing::warn!(
                    %key,
                    previous = %previous,
                    current = %remote_id,
                    "remote returned a different id for a known shift, replacing"
                );
                PersistOutcome::Replaced { previous }
            }
        };

        let now = format_ts(Timestamp::now());
        let (start, end) = split_columns(key);
        sqlx::query(SQL)
            .bind(key.station_id)
            .bind(format_date(key.date))
            .bind(&key.kind)
            .bind(start)
            .bind(end)
            .bind(remote_id.as_str())
            .bind(&now)
            .bind(&now)
            .execute(&self.pool)
            .await?;

        Ok(outcome)
    }

    /// Remembers that the remote shift of a key must still be cleared.
    pub async fn mark_pending_clear(
        &self,
        key: &LogicalShiftKey,
        remote_id: &ShiftId,
        start: Timestamp,
        end: Timestamp,
        error_message: &str,
    ) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO remote_pending_clears
    (station_id, shift_date, kind, split_start, split_end,
     remote_shift_id, start_time, end_time, error_message, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
ON CONFLICT(station_id, shift_date, kind, split_start, split_end) DO UPDATE SET
    remote_shift_id = excluded.remote_shift_id,
    start_time      = excluded.start_time,
    end_time        = excluded.end_time,
    error_message   = excluded.error_message,
    updated_at      = excluded.updated_at;
";

        let (split_start, split_end) = split_columns(key);
        sqlx::query(SQL)
            .bind(key.station_id)
            .bind(format_date(key.date))
            .bind(&key.kind)
            .bind(split_start)
            .bind(split_end)
            .bind(remote_id.as_str())
            .bind(format_ts(start))
            .bind(format_ts(end))
            .bind(error_message)
            .bind(format_ts(Timestamp::now()))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Forgets the pending clear of a key. Returns whether one existed.
    pub async fn settle(&self, key: &LogicalShiftKey) -> Result<bool, sqlx::Error> {
        const SQL: &str = "\
DELETE FROM remote_pending_clears
WHERE station_id = ? AND shift_date = ? AND kind = ? AND split_start = ? AND split_end = ?;
";

        let (start, end) = split_columns(key);
        let result = sqlx::query(SQL)
            .bind(key.station_id)
            .bind(format_date(key.date))
            .bind(&key.kind)
            .bind(start)
            .bind(end)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Pending clears of a station, in key order.
    pub async fn pending_clears(&self, station_id: i64) -> Result<Vec<PendingClear>, sqlx::Error> {
        const SQL: &str = "\
SELECT station_id, shift_date, kind, split_start, split_end,
       remote_shift_id, start_time, end_time, error_message
FROM remote_pending_clears
WHERE station_id = ?
ORDER BY shift_date, kind, split_start, split_end;
";

        let records: Vec<PendingClearRecord> = sqlx::query_as(SQL)
            .bind(station_id)
            .fetch_all(&self.pool)
            .await?;

        records.into_iter().map(PendingClear::try_from).collect()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PendingClearRecord {
    station_id: i64,
    shift_date: String,
    kind: String,
    split_start: String,
    split_end: String,
    remote_shift_id: String,
    start_time: String,
    end_time: String,
    error_message: Option<String>,
}

impl TryFrom<PendingClearRecord> for PendingClear {
    type Error = sqlx::Error;

    fn try_from(r: PendingClearRecord) -> Result<Self, Self::Error> {
        Ok(PendingClear {
            key: LogicalShiftKey {
                station_id: r.station_id,
                date: parse_date("shift_date", &r.shift_date)?,
                kind: r.kind,
                split_start: parse_opt_ts("split_start", Some(&r.split_start))?,
                split_end: parse_opt_ts("split_end", Some(&r.split_end))?,
            },
            remote_id: ShiftId::from(r.remote_shift_id),
            start: parse_ts("start_time", &r.start_time)?,
            end: parse_ts("end_time", &r.end_time)?,
            error_message: r.error_message,
        })
    }
}

fn split_columns(key: &LogicalShiftKey) -> (String, String) {
    (
        key.split_start.map(format_ts).unwrap_or_default(),
        key.split_end.map(format_ts).unwrap_or_default(),
    )
}
