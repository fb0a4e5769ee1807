// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Records without snapshot never cause a remote call.

use jiff::Timestamp;
use shiftsync_core::{SyncStatus, UnitAction};

use crate::common::{Harness, ShiftBuilder};

#[tokio::test]
async fn legacy_record_of_deleted_row_is_guard_skipped() {
    // Arrange - a record left by an earlier version, its row long gone
    let h = Harness::new().await;
    h.db()
        .sync_records
        .insert_legacy(900, 1, &"legacy-remote".into(), Timestamp::now())
        .await
        .unwrap();
    h.add(ShiftBuilder::day(3).user(1)).await;

    // Act
    let summary = h.run().await;

    // Assert
    assert_eq!(summary.guarded, 1);
    assert_eq!(summary.synced, 1);
    assert_eq!(summary.errors, 0);
    assert!(summary.is_success());

    let guarded = &summary.units[0];
    assert!(matches!(guarded.action, UnitAction::GuardSkipped { .. }));
    assert_eq!(guarded.local_shift_ids, vec![900]);
    assert!(guarded.key.is_none());

    assert_eq!(h.planner.calls(), 1);
    assert!(
        h.planner
            .requests()
            .iter()
            .all(|r| r.shift.as_ref().map(|s| s.as_str()) != Some("legacy-remote"))
    );
    let record = h.db().sync_records.get(900).await.unwrap().unwrap();
    assert!(record.is_legacy());
}

#[tokio::test]
async fn legacy_record_of_live_row_is_replaced_on_sync() {
    let h = Harness::new().await;
    let row = h.add(ShiftBuilder::day(4).user(1)).await;
    h.db()
        .sync_records
        .insert_legacy(row, 1, &"legacy-remote".into(), Timestamp::now())
        .await
        .unwrap();

    let summary = h.run().await;

    assert_eq!(summary.guarded, 0);
    assert_eq!(summary.synced, 1);
    assert_eq!(summary.updated, 0);
    let request = h.planner.requests().pop().unwrap();
    assert!(request.shift.is_none());

    let record = h.db().sync_records.get(row).await.unwrap().unwrap();
    assert_eq!(record.status, SyncStatus::Success);
    assert!(!record.is_legacy());
    assert_ne!(record.remote_shift_id, Some("legacy-remote".into()));
}

#[tokio::test]
async fn cleanup_legacy_deletes_only_snapshotless_records() {
    // Arrange
    let h = Harness::new().await;
    let row = h.add(ShiftBuilder::day(5).user(1)).await;
    h.run().await;
    let now = Timestamp::now();
    h.db()
        .sync_records
        .insert_legacy(901, 1, &"old-1".into(), now)
        .await
        .unwrap();
    h.db()
        .sync_records
        .insert_legacy(902, 2, &"old-2".into(), now)
        .await
        .unwrap();
    let calls = h.planner.calls();

    // Act
    let station_only = h.sync.cleanup_legacy(Some(1)).await.unwrap();
    let everything = h.sync.cleanup_legacy(None).await.unwrap();

    // Assert
    assert_eq!(station_only.deleted, 1);
    assert_eq!(station_only.failed, 0);
    assert!(station_only.errors.is_empty());
    assert_eq!(everything.deleted, 1);
    assert_eq!(h.planner.calls(), calls);

    assert!(h.db().sync_records.get(901).await.unwrap().is_none());
    assert!(h.db().sync_records.get(902).await.unwrap().is_none());
    assert!(h.db().sync_records.get(row).await.unwrap().is_some());

    // with the legacy record gone the next cycle has nothing to guard
    let summary = h.run().await;
    assert_eq!(summary.guarded, 0);
}
