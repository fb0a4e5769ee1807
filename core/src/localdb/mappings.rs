// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use shiftsync_remote::{PersonId, PositionId};
use sqlx::SqlitePool;

/// Local user to remote person mapping.
#[derive(Debug, Clone)]
pub struct UserMappings {
    pool: SqlitePool,
}

impl UserMappings {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, user_id: i64, person_id: &PersonId) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO remote_user_mappings (user_id, person_id)
VALUES (?, ?)
ON CONFLICT(user_id) DO UPDATE SET person_id = excluded.person_id;
";

        sqlx::query(SQL)
            .bind(user_id)
            .bind(person_id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Mapped persons for the given users; unmapped users are absent.
    pub async fn for_users(&self, user_ids: &[i64]) -> Result<HashMap<i64, PersonId>, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; user_ids.len()].join(", ");
        let sql = format!(
            "SELECT user_id, person_id FROM remote_user_mappings WHERE user_id IN ({placeholders});"
        );

        let mut query = sqlx::query_as::<_, (i64, String)>(&sql);
        for id in user_ids {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows
            .into_iter()
            .filter(|(_, person)| !person.trim().is_empty())
            .map(|(user, person)| (user, PersonId::from(person)))
            .collect())
    }
}

/// Remote position configured for one slot of a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionSlot {
    /// Remote position id.
    pub position_id: PositionId,
    /// Whether the remote checks a qualification for this slot.
    pub requires_qualification: bool,
}

/// Station slot to remote position mapping, slots 1 to 3.
#[derive(Debug, Clone)]
pub struct PositionMappings {
    pool: SqlitePool,
}

impl PositionMappings {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn upsert(
        &self,
        station_id: i64,
        position: u8,
        slot: &PositionSlot,
    ) -> Result<(), sqlx::Error> {
        const SQL: &str = "\
INSERT INTO remote_position_mappings (station_id, position_index, position_id, requires_qualification)
VALUES (?, ?, ?, ?)
ON CONFLICT(station_id, position_index) DO UPDATE SET
    position_id            = excluded.position_id,
    requires_qualification = excluded.requires_qualification;
";

        sqlx::query(SQL)
            .bind(station_id)
            .bind(position)
            .bind(slot.position_id.as_str())
            .bind(slot.requires_qualification)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn list(&self, station_id: i64) -> Result<HashMap<u8, PositionSlot>, sqlx::Error> {
        const SQL: &str = "\
SELECT position_index, position_id, requires_qualification
FROM remote_position_mappings
WHERE station_id = ?;
";

        let rows: Vec<(u8, String, bool)> = sqlx::query_as(SQL)
            .bind(station_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .filter(|(_, position, _)| !position.trim().is_empty())
            .map(|(index, position, requires_qualification)| {
                let slot = PositionSlot {
                    position_id: PositionId::from(position),
                    requires_qualification,
                };
                (index, slot)
            })
            .collect())
    }
}
