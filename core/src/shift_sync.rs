// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use crate::adapter::{HttpShiftPlanner, RemoteAdapter, ShiftPlanner, StationConfig};
use crate::config::Config;
use crate::context::SyncContext;
use crate::error::SyncError;
use crate::legacy;
use crate::localdb::{LocalDb, SyncRecord};
use crate::reconciler::Reconciler;
use crate::report::{LegacyCleanup, SyncSummary};
use crate::types::MonthScope;

/// Synchronization engine of one roster database.
///
/// Cheap to clone; clones share the database pool and the planner, so cycles
/// for different stations or months can run concurrently.
#[derive(Debug, Clone)]
pub struct ShiftSync {
    config: Config,
    db: LocalDb,
    adapter: RemoteAdapter,
}

impl ShiftSync {
    /// Creates an engine sending over HTTP.
    pub async fn new(config: Config) -> Result<Self, SyncError> {
        Self::with_planner(config, Arc::new(HttpShiftPlanner::new())).await
    }

    /// Creates an engine with a custom transport.
    pub async fn with_planner(
        mut config: Config,
        planner: Arc<dyn ShiftPlanner>,
    ) -> Result<Self, SyncError> {
        config
            .normalize()
            .map_err(|e| SyncError::Configuration(e.to_string()))?;

        let db = LocalDb::open(config.database.as_deref()).await?;
        Ok(Self {
            config,
            db,
            adapter: RemoteAdapter::new(planner),
        })
    }

    /// The local store.
    pub fn db(&self) -> &LocalDb {
        &self.db
    }

    /// Synchronizes the planned shifts of a station month.
    pub async fn sync(
        &self,
        station_id: i64,
        month: i8,
        year: i16,
        changes_only: bool,
    ) -> Result<SyncSummary, SyncError> {
        let scope = MonthScope::new(year, month)?;
        let ctx = SyncContext::new(station_id, scope).changes_only(changes_only);
        self.sync_with(&ctx).await
    }

    /// Synchronizes with progress reporting and cancellation.
    pub async fn sync_with(&self, ctx: &SyncContext) -> Result<SyncSummary, SyncError> {
        let station = self.station_config(ctx.station_id).await?;
        if !station.enabled {
            return Err(SyncError::Configuration(format!(
                "remote sync is disabled for station {}",
                ctx.station_id
            )));
        }

        Reconciler::new(&self.db, &self.adapter, &station)
            .run(ctx)
            .await
    }

    /// Deletes every sync record without snapshot, optionally for one station.
    pub async fn cleanup_legacy(
        &self,
        station_id: Option<i64>,
    ) -> Result<LegacyCleanup, SyncError> {
        legacy::cleanup_legacy(&self.db, station_id).await
    }

    /// Checks the endpoint and credentials configured for a station.
    pub async fn test_connection(&self, station_id: i64) -> Result<bool, SyncError> {
        let station = self.station_config(station_id).await?;
        self.adapter.test_connection(&station).await
    }

    /// Sync records of a station month, followed by the station's legacy records.
    pub async fn status(
        &self,
        station_id: i64,
        month: i8,
        year: i16,
    ) -> Result<Vec<SyncRecord>, SyncError> {
        let scope = MonthScope::new(year, month)?;
        let records = self.db.sync_records.list_by_station(station_id).await?;

        let (legacy, modern): (Vec<_>, Vec<_>) =
            records.into_iter().partition(SyncRecord::is_legacy);
        let mut in_scope: Vec<_> = modern
            .into_iter()
            .filter(|r| r.snapshot.as_ref().is_some_and(|s| scope.contains(s.date)))
            .collect();
        in_scope.extend(legacy);
        Ok(in_scope)
    }

    /// Remote settings of a station, with configured defaults applied.
    pub async fn station_config(&self, station_id: i64) -> Result<StationConfig, SyncError> {
        let record = self.db.stations.get(station_id).await?.ok_or_else(|| {
            SyncError::Configuration(format!(
                "station {station_id} is not configured for remote sync"
            ))
        })?;
        Ok(StationConfig::resolve(&record, &self.config.remote))
    }

    /// Closes the database.
    pub async fn close(self) -> Result<(), SyncError> {
        self.db.close().await
    }
}
