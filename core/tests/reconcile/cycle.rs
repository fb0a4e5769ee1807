// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Cycle scope, progress reporting, cancellation and status.

use shiftsync_core::{CancelToken, MonthScope, SyncContext, SyncProgress, UnitAction};
use tokio::sync::mpsc;

use crate::common::{Harness, MONTH, STATION, ShiftBuilder, YEAR};

#[tokio::test]
async fn cycle_covers_only_planned_rows_of_the_month() {
    let h = Harness::new().await;
    h.add(ShiftBuilder::day(30).user(1)).await;
    h.add(ShiftBuilder::day(3).user(2).status("cancelled")).await;
    h.add(ShiftBuilder::day(3).user(3).station(2)).await;

    let summary = h.run().await;

    assert_eq!(summary.synced, 1);
    assert_eq!(h.planner.calls(), 1);
    let july = h.sync.sync(STATION, 7, YEAR, true).await.unwrap();
    assert!(july.units.is_empty());
}

#[tokio::test]
async fn progress_reports_every_key() {
    let h = Harness::new().await;
    h.add(ShiftBuilder::day(3).user(1)).await;
    h.add(ShiftBuilder::night(3).user(2)).await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let ctx = SyncContext::new(STATION, MonthScope::new(YEAR, MONTH).unwrap()).with_progress(tx);
    let summary = h.sync.sync_with(&ctx).await.unwrap();
    drop(ctx);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert_eq!(events.len(), 4);
    assert!(matches!(events[0], SyncProgress::Started { keys: 2, .. }));
    assert!(matches!(&events[1], SyncProgress::UnitFinished(r) if r.action == UnitAction::Created));
    assert!(matches!(events[3], SyncProgress::Finished { cancelled: false }));
    assert_eq!(summary.synced, 2);
}

#[tokio::test]
async fn cancelled_cycle_stops_between_keys() {
    let h = Harness::new().await;
    h.add(ShiftBuilder::day(3).user(1)).await;
    h.add(ShiftBuilder::night(3).user(2)).await;
    let token = CancelToken::new();
    token.cancel();

    let ctx = SyncContext::new(STATION, MonthScope::new(YEAR, MONTH).unwrap())
        .with_cancel(token.clone());
    let summary = h.sync.sync_with(&ctx).await.unwrap();

    assert!(summary.cancelled);
    assert!(summary.units.is_empty());
    assert_eq!(h.planner.calls(), 0);
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn status_lists_records_of_the_month() {
    let h = Harness::new().await;
    let june = h.add(ShiftBuilder::day(3).user(1)).await;
    h.run().await;
    h.db()
        .sync_records
        .insert_legacy(700, STATION, &"old".into(), jiff::Timestamp::now())
        .await
        .unwrap();

    let records = h.sync.status(STATION, MONTH, YEAR).await.unwrap();
    let ids: Vec<_> = records.iter().map(|r| r.local_shift_id).collect();
    assert_eq!(ids, vec![june, 700]);

    let july = h.sync.status(STATION, 7, YEAR).await.unwrap();
    assert_eq!(july.len(), 1);
    assert!(july[0].is_legacy());
}

#[tokio::test]
async fn test_connection_uses_station_credentials() {
    let h = Harness::new().await;
    assert!(h.sync.test_connection(STATION).await.unwrap());

    let station = shiftsync_core::StationRecord {
        station_id: 3,
        enabled: true,
        auth_secret: Some("wrong".to_string()),
        ..Default::default()
    };
    h.db().stations.upsert(&station).await.unwrap();
    assert!(!h.sync.test_connection(3).await.unwrap());
    assert!(h.sync.test_connection(4).await.is_err());
}
