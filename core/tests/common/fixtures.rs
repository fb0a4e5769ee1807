// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Test data factories for integration tests.

use std::path::Path;
use std::sync::Arc;

use jiff::Timestamp;
use jiff::civil::{self, Date};
use shiftsync_core::{
    Config, LocalDb, NewShift, PositionSlot, RemoteDefaults, STATUS_PLANNED, ShiftSync,
    StationRecord, SyncSummary,
};

use super::planner::FakePlanner;

pub const STATION: i64 = 1;
pub const YEAR: i16 = 2024;
pub const MONTH: i8 = 6;

/// Creates a configuration with complete remote defaults.
pub fn test_config(database: Option<&Path>) -> Config {
    Config {
        database: database.map(Path::to_path_buf),
        remote: RemoteDefaults {
            base_url: Some("https://remote.test".to_string()),
            auth_id: Some("hook-id".to_string()),
            auth_secret: Some("hook-secret".to_string()),
            timeout_secs: Some(5),
            user_agent: None,
        },
    }
}

/// Builder for shift rows of the test station.
#[derive(Debug, Clone)]
pub struct ShiftBuilder {
    shift: NewShift,
}

impl ShiftBuilder {
    fn window(date: Date, kind: &str, start_hour: i8, hours: i64) -> Self {
        let start = at(date, start_hour);
        let end = start
            .checked_add(jiff::SignedDuration::from_hours(hours))
            .unwrap();
        Self {
            shift: NewShift {
                station_id: STATION,
                user_id: 0,
                date,
                start,
                end,
                kind: kind.to_string(),
                status: STATUS_PLANNED.to_string(),
                is_split: false,
                split_group_id: None,
                split_start: None,
                split_end: None,
            },
        }
    }

    /// A 07:00 to 19:00 day shift.
    pub fn day(day: i8) -> Self {
        Self::window(civil::date(YEAR, MONTH, day), "day", 7, 12)
    }

    /// A 19:00 to 07:00 night shift.
    pub fn night(day: i8) -> Self {
        Self::window(civil::date(YEAR, MONTH, day), "night", 19, 12)
    }

    /// One half of a split night shift, `offset` hours after 19:00.
    pub fn night_half(day: i8, offset: i64, hours: i64) -> Self {
        let mut builder = Self::night(day);
        let start = builder
            .shift
            .start
            .checked_add(jiff::SignedDuration::from_hours(offset))
            .unwrap();
        let end = start
            .checked_add(jiff::SignedDuration::from_hours(hours))
            .unwrap();
        builder.shift.start = start;
        builder.shift.end = end;
        builder.shift.is_split = true;
        builder.shift.split_group_id = Some(i64::from(day));
        builder.shift.split_start = Some(start);
        builder.shift.split_end = Some(end);
        builder
    }

    /// Moves the row to `hours` hours from `start_hour`, keeping date and kind.
    pub fn hours(mut self, start_hour: i8, hours: i64) -> Self {
        let start = at(self.shift.date, start_hour);
        self.shift.start = start;
        self.shift.end = start
            .checked_add(jiff::SignedDuration::from_hours(hours))
            .unwrap();
        self
    }

    pub fn user(mut self, user_id: i64) -> Self {
        self.shift.user_id = user_id;
        self
    }

    pub fn status(mut self, status: &str) -> Self {
        self.shift.status = status.to_string();
        self
    }

    pub fn station(mut self, station_id: i64) -> Self {
        self.shift.station_id = station_id;
        self
    }

    pub fn build(self) -> NewShift {
        self.shift
    }
}

fn at(date: Date, hour: i8) -> Timestamp {
    date.at(hour, 0, 0, 0).in_tz("UTC").unwrap().timestamp()
}

/// Engine over an in-memory database, a configured station and a fake remote.
pub struct Harness {
    pub sync: ShiftSync,
    pub planner: Arc<FakePlanner>,
}

impl Harness {
    /// Station 1 with a sheet, three positions and users 1 to 9 mapped.
    pub async fn new() -> Self {
        Self::with_database(None).await
    }

    pub async fn with_database(database: Option<&Path>) -> Self {
        let planner = Arc::new(FakePlanner::default());
        let sync = ShiftSync::with_planner(test_config(database), planner.clone())
            .await
            .expect("Failed to create engine");

        let harness = Self { sync, planner };
        harness.configure_station(STATION).await;
        for user in 1..=9 {
            harness
                .db()
                .user_mappings
                .upsert(user, &format!("person-{user}").into())
                .await
                .unwrap();
        }
        harness
    }

    pub async fn configure_station(&self, station_id: i64) {
        let station = StationRecord {
            station_id,
            enabled: true,
            shift_sheet: Some(format!("sheet-{station_id}")),
            ..Default::default()
        };
        self.db().stations.upsert(&station).await.unwrap();

        for position in 1..=3u8 {
            let slot = PositionSlot {
                position_id: format!("pos-{position}").into(),
                requires_qualification: position == 1,
            };
            self.db()
                .position_mappings
                .upsert(station_id, position, &slot)
                .await
                .unwrap();
        }
    }

    pub fn db(&self) -> &LocalDb {
        self.sync.db()
    }

    pub async fn add(&self, shift: ShiftBuilder) -> i64 {
        self.db().shifts.insert(&shift.build()).await.unwrap()
    }

    /// Runs a cycle for the test month with `changes_only`.
    pub async fn run(&self) -> SyncSummary {
        self.sync.sync(STATION, MONTH, YEAR, true).await.unwrap()
    }

    /// Runs a cycle that resends unchanged shifts.
    pub async fn run_all(&self) -> SyncSummary {
        self.sync.sync(STATION, MONTH, YEAR, false).await.unwrap()
    }
}
