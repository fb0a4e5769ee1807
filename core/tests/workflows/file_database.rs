// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Sync state kept in a database file across engine instances.

use shiftsync_core::{Config, ShiftSync, UnitAction};

use crate::common::{Harness, ShiftBuilder, TempState};

#[tokio::test]
async fn sync_state_survives_restart() {
    // Arrange
    let state = TempState::new().unwrap();
    let database = state.database();

    let first = Harness::with_database(Some(&database)).await;
    let row = first.add(ShiftBuilder::day(3).user(1)).await;
    let summary = first.run().await;
    assert_eq!(summary.synced, 1);
    let remote_id = first
        .db()
        .sync_records
        .get(row)
        .await
        .unwrap()
        .unwrap()
        .remote_shift_id;
    let Harness { sync, .. } = first;
    sync.close().await.unwrap();
    assert!(database.exists());

    // Act - a new process with a fresh remote sees the stored state
    let second = Harness::with_database(Some(&database)).await;
    let summary = second.run().await;

    // Assert
    assert_eq!(summary.units.len(), 1);
    assert_eq!(summary.units[0].action, UnitAction::Unchanged);
    assert_eq!(summary.units[0].remote_id, remote_id);
    assert_eq!(second.planner.calls(), 0);
}

#[tokio::test]
async fn config_file_drives_database_location() {
    // Arrange
    let state = TempState::new().unwrap();
    let database = state.database();
    let path = state
        .write_config(&format!(
            r#"
database = "{}"

[remote]
base_url = "https://remote.test"
auth_id = "hook-id"
auth_secret = "hook-secret"
"#,
            database.display()
        ))
        .unwrap();

    // Act
    let content = std::fs::read_to_string(path).unwrap();
    let config: Config = toml::from_str(&content).unwrap();
    let sync = ShiftSync::new(config).await.unwrap();

    // Assert
    assert!(database.exists());
    assert!(sync.station_config(1).await.is_err());
    sync.close().await.unwrap();
}
