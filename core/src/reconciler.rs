// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Per-key reconciliation of local rows against the remote system.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use jiff::Timestamp;
use shiftsync_remote::{PersonId, ShiftId};

use crate::adapter::{RemoteAdapter, StationConfig};
use crate::context::{SyncContext, SyncProgress};
use crate::error::SyncError;
use crate::grouper::{AssignmentUnit, group_rows};
use crate::localdb::{LocalDb, PendingClear, PositionSlot, SyncRecord, SyncStatus};
use crate::report::{SyncSummary, UnitAction, UnitReport};
use crate::types::{LogicalShiftKey, ShiftSnapshot};

/// State of a station month, loaded once at the start of a cycle.
struct CycleSnapshot {
    units: BTreeMap<LogicalShiftKey, AssignmentUnit>,
    /// Units whose key is already taken by another unit.
    duplicates: Vec<AssignmentUnit>,
    /// Assigned rows of every unit.
    current_row_ids: HashSet<i64>,
    /// Records with a snapshot in scope, by the key they describe.
    previous: BTreeMap<LogicalShiftKey, Vec<SyncRecord>>,
    records_by_row: HashMap<i64, SyncRecord>,
    /// Keys in scope whose last clear failed.
    pending: BTreeMap<LogicalShiftKey, PendingClear>,
    /// Legacy records whose row has been deleted.
    legacy_orphans: Vec<SyncRecord>,
    users: HashMap<i64, PersonId>,
    positions: HashMap<u8, PositionSlot>,
}

pub(crate) struct Reconciler<'a> {
    db: &'a LocalDb,
    adapter: &'a RemoteAdapter,
    station: &'a StationConfig,
}

impl<'a> Reconciler<'a> {
    pub(crate) fn new(db: &'a LocalDb, adapter: &'a RemoteAdapter, station: &'a StationConfig) -> Self {
        Self {
            db,
            adapter,
            station,
        }
    }

    /// Runs one cycle. Only local store failures abort it.
    #[tracing::instrument(skip_all, fields(station = ctx.station_id, scope = %ctx.scope))]
    pub(crate) async fn run(&self, ctx: &SyncContext) -> Result<SyncSummary, SyncError> {
        let snapshot = self.load(ctx).await?;
        let keys: BTreeSet<&LogicalShiftKey> = snapshot
            .units
            .keys()
            .chain(snapshot.previous.keys())
            .chain(snapshot.pending.keys())
            .collect();

        tracing::info!(
            units = snapshot.units.len(),
            keys = keys.len(),
            legacy_orphans = snapshot.legacy_orphans.len(),
            pending_clears = snapshot.pending.len(),
            "sync cycle started"
        );
        ctx.emit(SyncProgress::Started {
            station_id: ctx.station_id,
            scope: ctx.scope,
            keys: keys.len(),
        });

        let mut summary = SyncSummary::default();
        let mut finish = |summary: &mut SyncSummary, report: UnitReport| {
            ctx.emit(SyncProgress::UnitFinished(report.clone()));
            summary.record(report);
        };

        for record in &snapshot.legacy_orphans {
            tracing::warn!(
                local_shift_id = record.local_shift_id,
                "sync record without snapshot for a deleted row, skipping"
            );
            finish(&mut summary, guard_skipped(record));
        }

        for unit in &snapshot.duplicates {
            tracing::warn!(key = %unit.key, "another shift already uses this key, skipping");
            let reason = format!("another shift on {} already uses this key", unit.key);
            finish(&mut summary, unit_report(unit, None, UnitAction::Skipped { reason }));
        }

        for key in keys {
            if ctx.is_cancelled() {
                tracing::info!("sync cycle cancelled");
                summary.cancelled = true;
                break;
            }

            let unit = snapshot.units.get(key);
            let previous = snapshot.previous.get(key).map_or(&[][..], Vec::as_slice);

            let report = match unit {
                Some(unit) if !unit.is_empty() => {
                    self.sync_unit(ctx, &snapshot, unit, previous).await?
                }
                _ => self.clear_key(&snapshot, key, unit, previous).await?,
            };

            self.drop_stale(&snapshot, previous).await?;

            if let Some(report) = report {
                finish(&mut summary, report);
            }
        }

        tracing::info!(
            synced = summary.synced,
            updated = summary.updated,
            skipped = summary.skipped,
            errors = summary.errors,
            deleted = summary.deleted,
            delete_errors = summary.delete_errors,
            guarded = summary.guarded,
            cancelled = summary.cancelled,
            "sync cycle finished"
        );
        ctx.emit(SyncProgress::Finished {
            cancelled: summary.cancelled,
        });
        Ok(summary)
    }

    async fn load(&self, ctx: &SyncContext) -> Result<CycleSnapshot, SyncError> {
        let station_id = ctx.station_id;
        let rows = self.db.shifts.list_planned(station_id, ctx.scope).await?;

        let mut units = BTreeMap::new();
        let mut duplicates = Vec::new();
        let mut current_row_ids = HashSet::new();
        for unit in group_rows(rows) {
            current_row_ids.extend(unit.rows.iter().map(|r| r.id));
            if units.contains_key(&unit.key) {
                duplicates.push(unit);
            } else {
                units.insert(unit.key.clone(), unit);
            }
        }

        let mut previous: BTreeMap<_, Vec<_>> = BTreeMap::new();
        let mut records_by_row = HashMap::new();
        let mut legacy = Vec::new();
        for record in self.db.sync_records.list_by_station(station_id).await? {
            match &record.snapshot {
                None => legacy.push(record.clone()),
                Some(s) if ctx.scope.contains(s.date) => {
                    previous
                        .entry(s.key(station_id))
                        .or_default()
                        .push(record.clone());
                }
                Some(_) => {}
            }
            records_by_row.insert(record.local_shift_id, record);
        }

        let pending = self
            .db
            .identities
            .pending_clears(station_id)
            .await?
            .into_iter()
            .filter(|p| ctx.scope.contains(p.key.date))
            .map(|p| (p.key.clone(), p))
            .collect();

        let legacy_ids: Vec<_> = legacy.iter().map(|r| r.local_shift_id).collect();
        let alive = self.db.shifts.existing_ids(&legacy_ids).await?;
        let legacy_orphans = legacy
            .into_iter()
            .filter(|r| !alive.contains(&r.local_shift_id))
            .collect();

        let assignees: Vec<_> = units
            .values()
            .chain(&duplicates)
            .flat_map(|u| u.assignee_ids.iter().copied())
            .collect();
        let users = self.db.user_mappings.for_users(&assignees).await?;
        let positions = self.db.position_mappings.list(station_id).await?;

        Ok(CycleSnapshot {
            units,
            duplicates,
            current_row_ids,
            previous,
            records_by_row,
            pending,
            legacy_orphans,
            users,
            positions,
        })
    }

    /// Creates or updates the remote shift of a unit with assignees.
    async fn sync_unit(
        &self,
        ctx: &SyncContext,
        snapshot: &CycleSnapshot,
        unit: &AssignmentUnit,
        previous: &[SyncRecord],
    ) -> Result<Option<UnitReport>, SyncError> {
        let known_id = self.known_id(&unit.key, previous).await?;

        let pending = snapshot.pending.contains_key(&unit.key);
        if let Some(id) = &known_id
            && ctx.changes_only
            && !pending
            && is_unchanged(unit, id, &snapshot.records_by_row)
        {
            tracing::debug!(key = %unit.key, remote_id = %id, "unchanged, skipping");
            return Ok(Some(unit_report(unit, known_id.clone(), UnitAction::Unchanged)));
        }

        let result = self
            .adapter
            .send(
                unit,
                self.station,
                &snapshot.users,
                &snapshot.positions,
                known_id.as_ref(),
            )
            .await;

        let now = Timestamp::now();
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(key = %unit.key, error = %e, "failed to sync shift");
                let message = e.to_string();
                for row in &unit.rows {
                    self.db
                        .sync_records
                        .mark_error(row.id, row.station_id, &message, &ShiftSnapshot::of(row), now)
                        .await?;
                }
                return Ok(Some(unit_report(unit, known_id, UnitAction::failed(&e))));
            }
        };

        self.db.identities.persist(&unit.key, &outcome.remote_id).await?;
        if pending {
            self.db.identities.settle(&unit.key).await?;
        }
        for row in &unit.rows {
            self.db
                .sync_records
                .mark_success(
                    row.id,
                    row.station_id,
                    &outcome.remote_id,
                    &outcome.warnings,
                    &ShiftSnapshot::of(row),
                    &unit.assignee_ids,
                    now,
                )
                .await?;
        }
        self.drop_departed(snapshot, previous).await?;

        let action = if known_id.is_some() {
            UnitAction::Updated
        } else {
            UnitAction::Created
        };
        tracing::info!(key = %unit.key, remote_id = %outcome.remote_id, ?action, "shift synced");

        let mut report = unit_report(unit, Some(outcome.remote_id), action);
        report.warnings = outcome.warnings;
        Ok(Some(report))
    }

    /// Clears a key that lost every assignee, if it was ever synced.
    async fn clear_key(
        &self,
        snapshot: &CycleSnapshot,
        key: &LogicalShiftKey,
        unit: Option<&AssignmentUnit>,
        previous: &[SyncRecord],
    ) -> Result<Option<UnitReport>, SyncError> {
        let pending = snapshot.pending.get(key);
        let evidence = latest_evidence(previous);
        if evidence.is_none() && pending.is_none() {
            return Ok(unit.map(|unit| {
                let reason = "no assignees and no previous sync".to_string();
                unit_report(unit, None, UnitAction::Skipped { reason })
            }));
        }

        let fallback_id = evidence
            .and_then(|r| r.remote_shift_id.clone())
            .or_else(|| pending.map(|p| p.remote_id.clone()));
        let remote_id = match self.db.identities.resolve(key).await? {
            Some(id) => id,
            None => match fallback_id {
                Some(id) => id,
                None => return Ok(None),
            },
        };

        let window = evidence
            .and_then(|r| r.snapshot.as_ref())
            .map(|s| (s.start, s.end))
            .or_else(|| pending.map(|p| (p.start, p.end)));
        let (start, end) = match (unit, window) {
            (Some(unit), _) => (unit.start, unit.end),
            (None, Some(window)) => window,
            (None, None) => return Ok(None),
        };

        let local_shift_ids: Vec<_> = previous.iter().map(|r| r.local_shift_id).collect();
        let mut report = UnitReport {
            key: Some(key.clone()),
            local_shift_ids,
            assignee_ids: Vec::new(),
            remote_id: Some(remote_id.clone()),
            warnings: Vec::new(),
            action: UnitAction::Cleared,
        };

        match self.adapter.clear(start, end, self.station, &remote_id).await {
            Ok(outcome) => {
                tracing::info!(%key, remote_id = %remote_id, "shift cleared");
                self.drop_departed(snapshot, previous).await?;
                if pending.is_some() {
                    self.db.identities.settle(key).await?;
                }
                report.warnings = outcome.warnings;
            }
            Err(e) => {
                tracing::warn!(%key, remote_id = %remote_id, error = %e, "failed to clear shift");
                let message = e.to_string();
                let now = Timestamp::now();
                // the rows may have moved to another key
                self.db
                    .identities
                    .mark_pending_clear(key, &remote_id, start, end, &message)
                    .await?;
                for record in departed(snapshot, previous) {
                    if let Some(s) = &record.snapshot {
                        self.db
                            .sync_records
                            .mark_error(record.local_shift_id, record.station_id, &message, s, now)
                            .await?;
                    }
                }
                report.action = UnitAction::clear_failed(&e);
            }
        }

        Ok(Some(report))
    }

    /// Registry first, then the latest record proving a remote shift.
    async fn known_id(
        &self,
        key: &LogicalShiftKey,
        previous: &[SyncRecord],
    ) -> Result<Option<ShiftId>, SyncError> {
        if let Some(id) = self.db.identities.resolve(key).await? {
            return Ok(Some(id));
        }
        Ok(latest_evidence(previous).and_then(|r| r.remote_shift_id.clone()))
    }

    /// Deletes the records of rows that are in no unit any more.
    async fn drop_departed(
        &self,
        snapshot: &CycleSnapshot,
        previous: &[SyncRecord],
    ) -> Result<(), SyncError> {
        for record in departed(snapshot, previous) {
            self.db.sync_records.delete(record.local_shift_id).await?;
        }
        Ok(())
    }

    /// Deletes departed records that prove nothing about the remote side.
    async fn drop_stale(
        &self,
        snapshot: &CycleSnapshot,
        previous: &[SyncRecord],
    ) -> Result<(), SyncError> {
        for record in departed(snapshot, previous).filter(|r| !r.is_evidence()) {
            if self.db.sync_records.delete(record.local_shift_id).await? {
                tracing::debug!(local_shift_id = record.local_shift_id, "dropped stale sync record");
            }
        }
        Ok(())
    }
}

fn departed<'s>(
    snapshot: &'s CycleSnapshot,
    previous: &'s [SyncRecord],
) -> impl Iterator<Item = &'s SyncRecord> {
    previous
        .iter()
        .filter(|r| !snapshot.current_row_ids.contains(&r.local_shift_id))
}

fn latest_evidence(previous: &[SyncRecord]) -> Option<&SyncRecord> {
    previous
        .iter()
        .filter(|r| r.is_evidence())
        .max_by_key(|r| (r.synced_at.unwrap_or(r.updated_at), r.local_shift_id))
}

/// Every assigned row already carries a success record for this exact
/// window, roster and remote shift.
fn is_unchanged(
    unit: &AssignmentUnit,
    remote_id: &ShiftId,
    records_by_row: &HashMap<i64, SyncRecord>,
) -> bool {
    unit.rows.iter().all(|row| {
        records_by_row.get(&row.id).is_some_and(|record| {
            record.status == SyncStatus::Success
                && record.remote_shift_id.as_ref() == Some(remote_id)
                && record.snapshot.as_ref() == Some(&ShiftSnapshot::of(row))
                && record.assigned_user_ids == unit.assignee_ids
        })
    })
}

fn unit_report(unit: &AssignmentUnit, remote_id: Option<ShiftId>, action: UnitAction) -> UnitReport {
    UnitReport {
        key: Some(unit.key.clone()),
        local_shift_ids: unit.source_row_ids.clone(),
        assignee_ids: unit.assignee_ids.clone(),
        remote_id,
        warnings: Vec::new(),
        action,
    }
}

fn guard_skipped(record: &SyncRecord) -> UnitReport {
    UnitReport {
        key: None,
        local_shift_ids: vec![record.local_shift_id],
        assignee_ids: Vec::new(),
        remote_id: None,
        warnings: Vec::new(),
        action: UnitAction::GuardSkipped {
            reason: format!(
                "sync record of deleted shift {} has no snapshot, run legacy cleanup",
                record.local_shift_id
            ),
        },
    }
}
