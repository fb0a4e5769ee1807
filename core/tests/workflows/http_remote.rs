// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Full cycles over HTTP against a mock remote.

use serde_json::json;
use shiftsync_core::{ErrorKind, PositionSlot, ShiftSync, StationRecord, UnitAction};
use wiremock::matchers::{basic_auth, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{MONTH, STATION, ShiftBuilder, YEAR, test_config};

const HOOK_PATH: &str = "/comm-api/hooks/v1/ShiftPlanning";

async fn engine(server: &MockServer) -> ShiftSync {
    let sync = ShiftSync::new(test_config(None)).await.unwrap();
    let station = StationRecord {
        station_id: STATION,
        enabled: true,
        base_url: Some(server.uri()),
        shift_sheet: Some("sheet-1".to_string()),
        ..Default::default()
    };
    sync.db().stations.upsert(&station).await.unwrap();
    for position in 1..=2u8 {
        let slot = PositionSlot {
            position_id: format!("pos-{position}").into(),
            requires_qualification: false,
        };
        sync.db()
            .position_mappings
            .upsert(STATION, position, &slot)
            .await
            .unwrap();
    }
    for user in 1..=2 {
        sync.db()
            .user_mappings
            .upsert(user, &format!("person-{user}").into())
            .await
            .unwrap();
    }
    sync
}

#[tokio::test]
async fn http_cycle_creates_then_clears() {
    // Arrange
    let server = MockServer::start().await;
    let sync = engine(&server).await;
    let a = sync.db().shifts.insert(&ShiftBuilder::day(3).user(1).build()).await.unwrap();
    let b = sync.db().shifts.insert(&ShiftBuilder::day(3).user(2).build()).await.unwrap();

    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .and(basic_auth("hook-id", "hook-secret"))
        .and(body_partial_json(json!({
            "shiftSheet": "sheet-1",
            "assignments": [
                { "position": "pos-1", "person": "person-1" },
                { "position": "pos-2", "person": "person-2" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "Success",
            "warningFeedback": ["person-2 is not qualified for pos-2"],
            "errorFeedback": [],
            "shift": "remote-77"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .and(body_partial_json(json!({ "shift": "remote-77", "assignments": [] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": "Success",
            "warningFeedback": null,
            "errorFeedback": null,
            "shift": "remote-77"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Act - create
    let summary = sync.sync(STATION, MONTH, YEAR, true).await.unwrap();

    // Assert
    assert_eq!(summary.synced, 1);
    assert_eq!(summary.units[0].warnings, vec!["person-2 is not qualified for pos-2"]);
    let record = sync.db().sync_records.get(a).await.unwrap().unwrap();
    assert_eq!(record.remote_shift_id, Some("remote-77".into()));
    assert_eq!(record.warnings.len(), 1);

    // Act - the month is emptied
    sync.db().shifts.delete(a).await.unwrap();
    sync.db().shifts.delete(b).await.unwrap();
    let summary = sync.sync(STATION, MONTH, YEAR, true).await.unwrap();

    // Assert
    assert_eq!(summary.deleted, 1);
    assert!(sync.db().sync_records.get(a).await.unwrap().is_none());
}

#[tokio::test]
async fn http_rejection_with_error_status_is_remote_rejection() {
    let server = MockServer::start().await;
    let sync = engine(&server).await;
    let row = sync.db().shifts.insert(&ShiftBuilder::night(4).user(1).build()).await.unwrap();

    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "result": "Error",
            "warningFeedback": [],
            "errorFeedback": ["Shift sheet is locked"],
            "shift": null
        })))
        .mount(&server)
        .await;

    let summary = sync.sync(STATION, MONTH, YEAR, true).await.unwrap();

    match &summary.units[0].action {
        UnitAction::Failed { kind, message } => {
            assert_eq!(*kind, ErrorKind::RemoteRejection);
            assert!(message.ends_with("Shift sheet is locked"), "{message}");
        }
        other => panic!("unexpected action: {other:?}"),
    }
    let record = sync.db().sync_records.get(row).await.unwrap().unwrap();
    assert!(record.error_message.unwrap().contains("Shift sheet is locked"));
}

#[tokio::test]
async fn http_server_error_is_transport_failure() {
    let server = MockServer::start().await;
    let sync = engine(&server).await;
    sync.db().shifts.insert(&ShiftBuilder::day(5).user(2).build()).await.unwrap();

    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let summary = sync.sync(STATION, MONTH, YEAR, true).await.unwrap();

    assert_eq!(summary.errors, 1);
    assert!(matches!(
        summary.units[0].action,
        UnitAction::Failed {
            kind: ErrorKind::Transport,
            ..
        }
    ));
}

#[tokio::test]
async fn http_connection_test_reports_bad_credentials() {
    let server = MockServer::start().await;
    let sync = engine(&server).await;

    Mock::given(method("POST"))
        .and(path(HOOK_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    assert!(!sync.test_connection(STATION).await.unwrap());
}
