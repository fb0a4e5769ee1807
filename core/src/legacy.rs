// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::SyncError;
use crate::localdb::LocalDb;
use crate::report::LegacyCleanup;

/// Deletes sync records that carry no snapshot.
///
/// Only local records are touched; the remote system is never called, so any
/// remote shift they point to stays as it is.
#[tracing::instrument(skip(db))]
pub(crate) async fn cleanup_legacy(
    db: &LocalDb,
    station_id: Option<i64>,
) -> Result<LegacyCleanup, SyncError> {
    let records = db.sync_records.list_legacy(station_id).await?;
    tracing::info!(count = records.len(), "cleaning up legacy sync records");

    let mut cleanup = LegacyCleanup::default();
    for record in records {
        match db.sync_records.delete(record.local_shift_id).await {
            Ok(_) => cleanup.deleted += 1,
            Err(e) => {
                tracing::warn!(local_shift_id = record.local_shift_id, error = %e, "failed to delete legacy record");
                cleanup.failed += 1;
                cleanup
                    .errors
                    .push(format!("record {}: {e}", record.local_shift_id));
            }
        }
    }

    tracing::info!(deleted = cleanup.deleted, failed = cleanup.failed, "legacy cleanup finished");
    Ok(cleanup)
}
