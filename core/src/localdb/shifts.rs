// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;

use sqlx::SqlitePool;

use crate::localdb::{format_date, format_ts, parse_date, parse_opt_ts, parse_ts};
use crate::types::{MonthScope, NewShift, STATUS_PLANNED, ShiftRow};

/// Ids bound per `IN` query, below SQLite's host parameter limit.
const ID_CHUNK: usize = 500;

/// Local shift rows, written by the roster application.
#[derive(Debug, Clone)]
pub struct Shifts {
    pool: SqlitePool,
}

impl Shifts {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, shift: &NewShift) -> Result<i64, sqlx::Error> {
        const SQL: &str = "\
INSERT INTO shifts (station_id, user_id, date, start_time, end_time, type, status,
                    is_split_shift, split_group, split_start_time, split_end_time)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
RETURNING id;
";

        let (id,): (i64,) = sqlx::query_as(SQL)
            .bind(shift.station_id)
            .bind(shift.user_id)
            .bind(format_date(shift.date))
            .bind(format_ts(shift.start))
            .bind(format_ts(shift.end))
            .bind(&shift.kind)
            .bind(&shift.status)
            .bind(shift.is_split)
            .bind(shift.split_group_id)
            .bind(shift.split_start.map(format_ts))
            .bind(shift.split_end.map(format_ts))
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        const SQL: &str = "DELETE FROM shifts WHERE id = ?;";

        let result = sqlx::query(SQL).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reassigns a row, `0` leaves it open.
    pub async fn set_user(&self, id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        const SQL: &str = "UPDATE shifts SET user_id = ? WHERE id = ?;";

        let result = sqlx::query(SQL)
            .bind(user_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Changes the shift type of a row in place.
    pub async fn set_kind(&self, id: i64, kind: &str) -> Result<bool, sqlx::Error> {
        const SQL: &str = "UPDATE shifts SET type = ? WHERE id = ?;";

        let result = sqlx::query(SQL)
            .bind(kind)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Planned rows of a station within the month, ordered by id.
    pub async fn list_planned(
        &self,
        station_id: i64,
        scope: MonthScope,
    ) -> Result<Vec<ShiftRow>, sqlx::Error> {
        const SQL: &str = "\
SELECT id, station_id, user_id, date, start_time, end_time, type, status,
       is_split_shift, split_group, split_start_time, split_end_time
FROM shifts
WHERE station_id = ? AND status = ? AND date >= ? AND date < ?
ORDER BY id ASC;
";

        let records: Vec<ShiftRecord> = sqlx::query_as(SQL)
            .bind(station_id)
            .bind(STATUS_PLANNED)
            .bind(format_date(scope.first_day()))
            .bind(format_date(scope.next_first_day()))
            .fetch_all(&self.pool)
            .await?;

        records.into_iter().map(ShiftRow::try_from).collect()
    }

    /// Returns which of the given ids still exist.
    pub async fn existing_ids(&self, ids: &[i64]) -> Result<HashSet<i64>, sqlx::Error> {
        let mut existing = HashSet::new();
        for chunk in ids.chunks(ID_CHUNK) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!("SELECT id FROM shifts WHERE id IN ({placeholders});");

            let mut query = sqlx::query_as::<_, (i64,)>(&sql);
            for id in chunk {
                query = query.bind(id);
            }

            let rows = query.fetch_all(&self.pool).await?;
            existing.extend(rows.into_iter().map(|(id,)| id));
        }
        Ok(existing)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ShiftRecord {
    id: i64,
    station_id: i64,
    user_id: i64,
    date: String,
    start_time: String,
    end_time: String,
    #[sqlx(rename = "type")]
    kind: String,
    status: String,
    is_split_shift: bool,
    split_group: Option<i64>,
    split_start_time: Option<String>,
    split_end_time: Option<String>,
}

impl TryFrom<ShiftRecord> for ShiftRow {
    type Error = sqlx::Error;

    fn try_from(r: ShiftRecord) -> Result<Self, Self::Error> {
        Ok(ShiftRow {
            id: r.id,
            station_id: r.station_id,
            user_id: r.user_id,
            date: parse_date("date", &r.date)?,
            start: parse_ts("start_time", &r.start_time)?,
            end: parse_ts("end_time", &r.end_time)?,
            kind: r.kind,
            status: r.status,
            is_split: r.is_split_shift,
            split_group_id: r.split_group,
            split_start: parse_opt_ts("split_start_time", r.split_start_time.as_deref())?,
            split_end: parse_opt_ts("split_end_time", r.split_end_time.as_deref())?,
        })
    }
}
