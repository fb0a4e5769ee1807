// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc::UnboundedSender;

use crate::report::UnitReport;
use crate::types::MonthScope;

/// Cooperative cancellation of a running cycle, checked between keys.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Progress events of a cycle.
#[derive(Debug, Clone)]
pub enum SyncProgress {
    /// The cycle loaded its snapshot.
    Started { station_id: i64, scope: MonthScope, keys: usize },
    /// One key was handled.
    UnitFinished(UnitReport),
    /// The cycle ended.
    Finished { cancelled: bool },
}

/// Inputs of one sync cycle.
#[derive(Debug, Clone)]
pub struct SyncContext {
    pub station_id: i64,
    pub scope: MonthScope,
    /// Skip keys whose remote state already matches.
    pub changes_only: bool,
    progress: Option<UnboundedSender<SyncProgress>>,
    cancel: Option<CancelToken>,
}

impl SyncContext {
    pub fn new(station_id: i64, scope: MonthScope) -> Self {
        Self {
            station_id,
            scope,
            changes_only: true,
            progress: None,
            cancel: None,
        }
    }

    pub fn changes_only(mut self, changes_only: bool) -> Self {
        self.changes_only = changes_only;
        self
    }

    pub fn with_progress(mut self, sender: UnboundedSender<SyncProgress>) -> Self {
        self.progress = Some(sender);
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    pub(crate) fn emit(&self, event: SyncProgress) {
        if let Some(sender) = &self.progress
            && sender.send(event).is_err()
        {
            tracing::trace!("progress receiver dropped");
        }
    }
}
