// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

mod identities;
mod mappings;
mod shifts;
mod stations;
mod sync_records;


use std::path::Path;

use jiff::Timestamp;
use jiff::civil::Date;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::SyncError;

pub use crate::localdb::identities::{Identities, PendingClear, PersistOutcome};
pub use crate::localdb::mappings::{PositionMappings, PositionSlot, UserMappings};
pub use crate::localdb::shifts::Shifts;
pub use crate::localdb::stations::{StationRecord, Stations};
pub use crate::localdb::sync_records::{SyncRecord, SyncRecords, SyncStatus};

/// Local SQLite store shared with the roster application.
#[derive(Debug, Clone)]
pub struct LocalDb {
    pool: SqlitePool,

    pub shifts: Shifts,
    pub stations: Stations,
    pub user_mappings: UserMappings,
    pub position_mappings: PositionMappings,
    pub identities: Identities,
    pub sync_records: SyncRecords,
}

impl LocalDb {
    /// Opens a sqlite database connection.
    /// If `filename` is `None`, it opens an in-memory database.
    pub async fn open(filename: Option<&Path>) -> Result<Self, SyncError> {
        let (options, pool_options) = if let Some(filename) = filename {
            tracing::info!(path = %filename.display(), "connecting to SQLite database");
            let options = SqliteConnectOptions::new()
                .filename(filename)
                .create_if_missing(true);
            (options, SqlitePoolOptions::new())
        } else {
            tracing::info!("connecting to in-memory SQLite database");
            // every connection to `:memory:` is a separate database, keep one alive
            let pool_options = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            (SqliteConnectOptions::new().in_memory(true), pool_options)
        };

        let pool = pool_options.connect_with(options).await?;

        sqlx::migrate!("src/localdb/migrations") // relative path from the crate root
            .run(&pool)
            .await?;

        tracing::debug!("database ready");
        Ok(LocalDb {
            shifts: Shifts::new(pool.clone()),
            stations: Stations::new(pool.clone()),
            user_mappings: UserMappings::new(pool.clone()),
            position_mappings: PositionMappings::new(pool.clone()),
            identities: Identities::new(pool.clone()),
            sync_records: SyncRecords::new(pool.clone()),
            pool,
        })
    }

    pub async fn close(self) -> Result<(), SyncError> {
        tracing::debug!("closing database connection");
        self.pool.close().await;
        Ok(())
    }
}

fn format_date(date: Date) -> String {
    date.to_string()
}

fn format_ts(ts: Timestamp) -> String {
    ts.to_string()
}

fn parse_date(column: &str, value: &str) -> Result<Date, sqlx::Error> {
    value.parse().map_err(|e| decode_error(column, value, e))
}

fn parse_ts(column: &str, value: &str) -> Result<Timestamp, sqlx::Error> {
    value.parse().map_err(|e| decode_error(column, value, e))
}

fn parse_opt_ts(column: &str, value: Option<&str>) -> Result<Option<Timestamp>, sqlx::Error> {
    match value {
        Some(v) if !v.is_empty() => parse_ts(column, v).map(Some),
        _ => Ok(None),
    }
}

fn decode_error(column: &str, value: &str, e: impl std::fmt::Display) -> sqlx::Error {
    sqlx::Error::Decode(format!("invalid {column} value {value:?}: {e}").into())
}
