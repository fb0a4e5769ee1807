// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use sqlx::SqlitePool;

/// Per-station remote settings.
#[derive(Debug, Clone)]
pub struct Stations {
    pool: SqlitePool,
}

impl Stations {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, station_id: i64) -> Result<Option<StationRecord>, sqlx::Error> {
        const SQL: &str = "\
SELECT station_id, enabled, base_url, auth_id, auth_secret, shift_sheet
FROM remote_stations
WHERE station_id = ?;
";

        sqlx::query_as(SQL)
            .bind(station_id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn upsert(&self, station: &StationRecord) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO remote_stations (station_id, enabled, base_url, auth_id, auth_secret, shift_sheet)
VALUES (?, ?, ?, ?, ?, ?)
ON CONFLICT(station_id) DO UPDATE SET
    enabled     = excluded.enabled,
    base_url    = excluded.base_url,
    auth_id     = excluded.auth_id,
    auth_secret = excluded.auth_secret,
    shift_sheet = excluded.shift_sheet;
";

        sqlx::query(SQL)
            .bind(station.station_id)
            .bind(station.enabled)
            .bind(&station.base_url)
            .bind(&station.auth_id)
            .bind(&station.auth_secret)
            .bind(&station.shift_sheet)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Row of the station settings table. Unset values fall back to the
/// configured remote defaults.
#[derive(Clone, Default, sqlx::FromRow)]
pub struct StationRecord {
    pub station_id: i64,
    pub enabled: bool,
    pub base_url: Option<String>,
    pub auth_id: Option<String>,
    pub auth_secret: Option<String>,
    pub shift_sheet: Option<String>,
}

impl std::fmt::Debug for StationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StationRecord")
            .field("station_id", &self.station_id)
            .field("enabled", &self.enabled)
            .field("base_url", &self.base_url)
            .field("auth_id", &self.auth_id)
            .field("auth_secret", &self.auth_secret.as_ref().map(|_| "[REDACTED]"))
            .field("shift_sheet", &self.shift_sheet)
            .finish()
    }
}
