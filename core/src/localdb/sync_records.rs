// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use shiftsync_remote::ShiftId;
use sqlx::SqlitePool;

use crate::localdb::{decode_error, format_ts, parse_opt_ts, parse_ts};
use crate::types::ShiftSnapshot;

/// Outcome of the last sync attempt of a local row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Success,
    Error,
}

impl SyncStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SyncStatus::Pending => "pending",
            SyncStatus::Success => "success",
            SyncStatus::Error => "error",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(SyncStatus::Pending),
            "success" => Ok(SyncStatus::Success),
            "error" => Ok(SyncStatus::Error),
            _ => Err(format!("unknown sync status: {s}")),
        }
    }
}

/// Sync state of one local shift row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SyncRecord {
    pub local_shift_id: i64,
    pub station_id: i64,
    pub status: SyncStatus,
    pub remote_shift_id: Option<ShiftId>,
    pub error_message: Option<String>,
    pub warnings: Vec<String>,
    /// Shift metadata at the time of the attempt; `None` for records written
    /// before snapshots were kept.
    pub snapshot: Option<ShiftSnapshot>,
    /// Roster of the unit the row belonged to, in slot order.
    pub assigned_user_ids: Vec<i64>,
    pub synced_at: Option<Timestamp>,
    pub updated_at: Timestamp,
}

impl SyncRecord {
    /// Records without a snapshot cannot be reconciled.
    pub fn is_legacy(&self) -> bool {
        self.snapshot.is_none()
    }

    /// Whether the record proves a remote object with assignees exists for
    /// its snapshot's key.
    pub fn is_evidence(&self) -> bool {
        self.snapshot.is_some()
            && self.remote_shift_id.is_some()
            && !self.assigned_user_ids.is_empty()
    }
}

/// Store of sync records, one per local row ever attempted.
#[derive(Debug, Clone)]
pub struct SyncRecords {
    pool: SqlitePool,
}

impl SyncRecords {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Records a successful sync. A success always carries a remote id.
    pub async fn mark_success(
        &self,
        local_shift_id: i64,
        station_id: i64,
        remote_id: &ShiftId,
        warnings: &[String],
        snapshot: &ShiftSnapshot,
        roster: &[i64],
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO remote_sync_records
    (local_shift_id, station_id, status, remote_shift_id, error_message, warnings,
     snapshot, assigned_user_ids, synced_at, updated_at)
VALUES (?, ?, 'success', ?, NULL, ?, ?, ?, ?, ?)
ON CONFLICT(local_shift_id) DO UPDATE SET
    station_id        = excluded.station_id,
    status            = excluded.status,
    remote_shift_id   = excluded.remote_shift_id,
    error_message     = NULL,
    warnings          = excluded.warnings,
    snapshot          = excluded.snapshot,
    assigned_user_ids = excluded.assigned_user_ids,
    synced_at         = excluded.synced_at,
    updated_at        = excluded.updated_at;
";

        let now = format_ts(now);
        sqlx::query(SQL)
            .bind(local_shift_id)
            .bind(station_id)
            .bind(remote_id.as_str())
            .bind(encode_json(warnings)?)
            .bind(encode_json(snapshot)?)
            .bind(encode_json(roster)?)
            .bind(&now)
            .bind(&now)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Records a failed attempt.
    ///
    /// An existing record with a snapshot keeps its snapshot, roster and
    /// remote id so the previous remote state stays known. A legacy record is
    /// replaced by a snapshot of the current row.
    pub async fn mark_error(
        &self,
        local_shift_id: i64,
        station_id: i64,
        message: &str,
        snapshot: &ShiftSnapshot,
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO remote_sync_records
    (local_shift_id, station_id, status, remote_shift_id, error_message, warnings,
     snapshot, assigned_user_ids, synced_at, updated_at)
VALUES (?, ?, 'error', NULL, ?, '[]', ?, '[]', NULL, ?)
ON CONFLICT(local_shift_id) DO UPDATE SET
    station_id        = excluded.station_id,
    status            = excluded.status,
    error_message     = excluded.error_message,
    remote_shift_id   = CASE WHEN remote_sync_records.snapshot IS NULL
                             THEN NULL ELSE remote_sync_records.remote_shift_id END,
    assigned_user_ids = CASE WHEN remote_sync_records.snapshot IS NULL
                             THEN '[]' ELSE remote_sync_records.assigned_user_ids END,
    snapshot          = COALESCE(remote_sync_records.snapshot, excluded.snapshot),
    updated_at        = excluded.updated_at;
";

        sqlx::query(SQL)
            .bind(local_shift_id)
            .bind(station_id)
            .bind(message)
            .bind(encode_json(snapshot)?)
            .bind(format_ts(now))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete(&self, local_shift_id: i64) -> Result<bool, sqlx::Error> {
        const SQL: &str = "DELETE FROM remote_sync_records WHERE local_shift_id = ?;";

        let result = sqlx::query(SQL)
            .bind(local_shift_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get(&self, local_shift_id: i64) -> Result<Option<SyncRecord>, sqlx::Error> {
        const SQL: &str = "\
SELECT local_shift_id, station_id, status, remote_shift_id, error_message, warnings,
       snapshot, assigned_user_ids, synced_at, updated_at
FROM remote_sync_records
WHERE local_shift_id = ?;
";

        let record: Option<SyncRecordRow> = sqlx::query_as(SQL)
            .bind(local_shift_id)
            .fetch_optional(&self.pool)
            .await?;

        record.map(SyncRecord::try_from).transpose()
    }

    /// All records of a station, ordered by local row id.
    pub async fn list_by_station(&self, station_id: i64) -> Result<Vec<SyncRecord>, sqlx::Error> {
        const SQL: &str = "\
SELECT local_shift_id, station_id, status, remote_shift_id, error_message, warnings,
       snapshot, assigned_user_ids, synced_at, updated_at
FROM remote_sync_records
WHERE station_id = ?
ORDER BY local_shift_id ASC;
";

        let records: Vec<SyncRecordRow> = sqlx::query_as(SQL)
            .bind(station_id)
            .fetch_all(&self.pool)
            .await?;

        records.into_iter().map(SyncRecord::try_from).collect()
    }

    /// Records without a snapshot, optionally for one station.
    pub async fn list_legacy(
        &self,
        station_id: Option<i64>,
    ) -> Result<Vec<SyncRecord>, sqlx::Error> {
        const SQL: &str = "\
SELECT local_shift_id, station_id, status, remote_shift_id, error_message, warnings,
       snapshot, assigned_user_ids, synced_at, updated_at
FROM remote_sync_records
WHERE snapshot IS NULL AND (? IS NULL OR station_id = ?)
ORDER BY local_shift_id ASC;
";

        let records: Vec<SyncRecordRow> = sqlx::query_as(SQL)
            .bind(station_id)
            .bind(station_id)
            .fetch_all(&self.pool)
            .await?;

        records.into_iter().map(SyncRecord::try_from).collect()
    }

    /// Writes a snapshot-less success record, as left behind by earlier
    /// versions of the synchronization.
    pub async fn insert_legacy(
        &self,
        local_shift_id: i64,
        station_id: i64,
        remote_id: &ShiftId,
        synced_at: Timestamp,
    ) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO remote_sync_records
    (local_shift_id, station_id, status, remote_shift_id, snapshot, synced_at, updated_at)
VALUES (?, ?, 'success', ?, NULL, ?, ?);
";

        let synced_at = format_ts(synced_at);
        sqlx::query(SQL)
            .bind(local_shift_id)
            .bind(station_id)
            .bind(remote_id.as_str())
            .bind(&synced_at)
            .bind(&synced_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SyncRecordRow {
    local_shift_id: i64,
    station_id: i64,
    status: String,
    remote_shift_id: Option<String>,
    error_message: Option<String>,
    warnings: String,
    snapshot: Option<String>,
    assigned_user_ids: String,
    synced_at: Option<String>,
    updated_at: String,
}

impl TryFrom<SyncRecordRow> for SyncRecord {
    type Error = sqlx::Error;

    fn try_from(r: SyncRecordRow) -> Result<Self, Self::Error> {
        let status = r
            .status
            .parse()
            .map_err(|e| decode_error("status", &r.status, e))?;

        let snapshot = match r.snapshot.as_deref() {
            Some(s) if !s.trim().is_empty() => Some(decode_json("snapshot", s)?),
            _ => None,
        };

        Ok(SyncRecord {
            local_shift_id: r.local_shift_id,
            station_id: r.station_id,
            status,
            remote_shift_id: r
                .remote_shift_id
                .filter(|id| !id.trim().is_empty())
                .map(ShiftId::from),
            error_message: r.error_message,
            warnings: decode_json("warnings", &r.warnings)?,
            snapshot,
            assigned_user_ids: decode_json("assigned_user_ids", &r.assigned_user_ids)?,
            synced_at: parse_opt_ts("synced_at", r.synced_at.as_deref())?,
            updated_at: parse_ts("updated_at", &r.updated_at)?,
        })
    }
}

fn encode_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, sqlx::Error> {
    serde_json::to_string(value).map_err(|e| sqlx::Error::Encode(e.into()))
}

fn decode_json<T: serde::de::DeserializeOwned>(column: &str, value: &str) -> Result<T, sqlx::Error> {
    serde_json::from_str(value).map_err(|e| decode_error(column, value, e))
}
