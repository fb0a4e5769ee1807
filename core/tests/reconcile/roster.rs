// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Roster changes: reduction, emptying, moves and slot limits.

use shiftsync_core::{ErrorKind, SyncStatus, UnitAction};

use crate::common::{Harness, ShiftBuilder};

#[tokio::test]
async fn removed_assignee_reduces_remote_roster() {
    // Arrange
    let h = Harness::new().await;
    let a = h.add(ShiftBuilder::day(10).user(1)).await;
    let b = h.add(ShiftBuilder::day(10).user(2)).await;
    let c = h.add(ShiftBuilder::day(10).user(3)).await;
    h.run().await;
    let remote_id = h.db().sync_records.get(a).await.unwrap().unwrap().remote_shift_id.unwrap();

    // Act
    h.db().shifts.delete(b).await.unwrap();
    let summary = h.run().await;

    // Assert
    assert_eq!(summary.updated, 1);
    assert_eq!(
        h.planner.persons(&remote_id).unwrap(),
        vec!["person-1", "person-3"]
    );
    let last = h.planner.requests().pop().unwrap();
    let positions: Vec<_> = last.assignments.iter().map(|x| x.position.as_str()).collect();
    assert_eq!(positions, vec!["pos-1", "pos-2"]);

    assert!(h.db().sync_records.get(b).await.unwrap().is_none());
    for id in [a, c] {
        let record = h.db().sync_records.get(id).await.unwrap().unwrap();
        assert_eq!(record.assigned_user_ids, vec![1, 3]);
    }
}

#[tokio::test]
async fn unassigned_row_leaves_the_roster() {
    let h = Harness::new().await;
    let a = h.add(ShiftBuilder::day(11).user(1)).await;
    let b = h.add(ShiftBuilder::day(11).user(2)).await;
    h.run().await;

    h.db().shifts.set_user(a, 0).await.unwrap();
    let summary = h.run().await;

    assert_eq!(summary.updated, 1);
    assert!(h.db().sync_records.get(a).await.unwrap().is_none());
    let record = h.db().sync_records.get(b).await.unwrap().unwrap();
    assert_eq!(record.assigned_user_ids, vec![2]);
    let last = h.planner.requests().pop().unwrap();
    assert_eq!(last.assignments.len(), 1);
    assert_eq!(last.assignments[0].person.as_str(), "person-2");
    assert_eq!(last.assignments[0].position.as_str(), "pos-1");
}

#[tokio::test]
async fn deleting_every_row_clears_the_remote_shift() {
    // Arrange
    let h = Harness::new().await;
    let a = h.add(ShiftBuilder::night(12).user(1)).await;
    let b = h.add(ShiftBuilder::night(12).user(2)).await;
    h.run().await;
    let remote_id = h.db().sync_records.get(a).await.unwrap().unwrap().remote_shift_id.unwrap();
    let key = h.db().sync_records.get(a).await.unwrap().unwrap().snapshot.unwrap().key(1);

    // Act
    h.db().shifts.delete(a).await.unwrap();
    h.db().shifts.delete(b).await.unwrap();
    let summary = h.run().await;

    // Assert
    assert_eq!(summary.deleted, 1);
    assert_eq!(summary.units[0].action, UnitAction::Cleared);
    let last = h.planner.requests().pop().unwrap();
    assert!(last.is_clear());
    assert_eq!(last.shift.as_ref(), Some(&remote_id));
    assert_eq!(h.planner.persons(&remote_id).unwrap(), Vec::<String>::new());

    assert!(h.db().sync_records.get(a).await.unwrap().is_none());
    assert!(h.db().sync_records.get(b).await.unwrap().is_none());
    assert_eq!(
        h.db().identities.resolve(&key).await.unwrap(),
        Some(remote_id.clone())
    );

    // nothing left to clear
    let calls = h.planner.calls();
    let summary = h.run().await;
    assert_eq!(h.planner.calls(), calls);
    assert!(summary.units.is_empty());

    // a shift planned again for the slot reuses the remote object
    h.add(ShiftBuilder::night(12).user(4)).await;
    let summary = h.run().await;
    assert_eq!(summary.updated, 1);
    assert_eq!(h.planner.created(), 1);
    assert_eq!(h.planner.persons(&remote_id).unwrap(), vec!["person-4"]);
}

#[tokio::test]
async fn unassigning_every_row_clears_the_remote_shift() {
    let h = Harness::new().await;
    let a = h.add(ShiftBuilder::day(13).user(1)).await;
    h.run().await;

    h.db().shifts.set_user(a, 0).await.unwrap();
    let summary = h.run().await;

    assert_eq!(summary.deleted, 1);
    assert!(h.planner.requests().pop().unwrap().is_clear());
    assert!(h.db().sync_records.get(a).await.unwrap().is_none());
}

#[tokio::test]
async fn open_shift_never_synced_is_skipped() {
    let h = Harness::new().await;
    h.add(ShiftBuilder::day(14)).await;

    let summary = h.run().await;

    assert_eq!(h.planner.calls(), 0);
    assert_eq!(summary.skipped, 1);
    assert!(matches!(summary.units[0].action, UnitAction::Skipped { .. }));
}

#[tokio::test]
async fn more_than_three_assignees_is_rejected_locally() {
    let h = Harness::new().await;
    let mut rows = Vec::new();
    for user in 1..=4 {
        rows.push(h.add(ShiftBuilder::day(15).user(user)).await);
    }

    let summary = h.run().await;

    assert_eq!(h.planner.calls(), 0);
    assert_eq!(summary.errors, 1);
    match &summary.units[0].action {
        UnitAction::Failed { kind, .. } => assert_eq!(*kind, ErrorKind::Configuration),
        other => panic!("unexpected action: {other:?}"),
    }
    for id in rows {
        let record = h.db().sync_records.get(id).await.unwrap().unwrap();
        assert_eq!(record.status, SyncStatus::Error);
        assert!(record.remote_shift_id.is_none());
    }
}

#[tokio::test]
async fn row_moved_to_another_shift_is_recorded_there() {
    // Arrange - user 2 works the day shift, then swaps into the night shift
    let h = Harness::new().await;
    let day_a = h.add(ShiftBuilder::day(16).user(1)).await;
    let day_b = h.add(ShiftBuilder::day(16).user(2)).await;
    h.add(ShiftBuilder::night(16).user(3)).await;
    h.run().await;
    let day_id = h.db().sync_records.get(day_a).await.unwrap().unwrap().remote_shift_id.unwrap();

    // Act
    h.db().shifts.delete(day_b).await.unwrap();
    let night_b = h.add(ShiftBuilder::night(16).user(2)).await;
    let summary = h.run().await;

    // Assert
    assert_eq!(summary.updated, 2);
    assert_eq!(h.planner.created(), 2);
    assert_eq!(h.planner.persons(&day_id).unwrap(), vec!["person-1"]);
    let record = h.db().sync_records.get(night_b).await.unwrap().unwrap();
    assert_eq!(record.assigned_user_ids, vec![3, 2]);
    assert!(h.db().sync_records.get(day_b).await.unwrap().is_none());
}

#[tokio::test]
async fn second_window_with_same_key_is_skipped_every_cycle() {
    // Arrange - two day shifts on the same date with different windows
    let h = Harness::new().await;
    let early = h.add(ShiftBuilder::day(12).user(1)).await;
    let late = h.add(ShiftBuilder::day(12).hours(9, 8).user(2)).await;

    for cycle in 0..2 {
        // Act
        let summary = h.run().await;

        // Assert - only the first window reaches the remote
        assert_eq!(h.planner.calls(), 1, "cycle {cycle}");
        assert_eq!(summary.skipped, if cycle == 0 { 1 } else { 2 });
        let skipped = summary
            .units
            .iter()
            .find(|u| u.local_shift_ids == vec![late])
            .unwrap();
        match &skipped.action {
            UnitAction::Skipped { reason } => {
                assert!(reason.contains("already uses this key"), "{reason}")
            }
            other => panic!("unexpected action: {other:?}"),
        }
        assert!(skipped.remote_id.is_none());
        assert!(h.db().sync_records.get(late).await.unwrap().is_none());
    }

    let record = h.db().sync_records.get(early).await.unwrap().unwrap();
    assert_eq!(record.status, SyncStatus::Success);
    assert_eq!(record.assigned_user_ids, vec![1]);
}
