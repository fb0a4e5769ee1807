// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command, arg};
use shiftsync_core::{CancelToken, MonthScope, ShiftSync, SyncContext, SyncProgress};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::arg::{CommonArgs, MonthArgs, StationArgs};
use crate::unit_formatter::UnitFormatter;
use crate::util::OutputFormat;

#[derive(Debug, Clone)]
pub struct CmdSync {
    pub station: i64,
    pub scope: MonthArgs,
    pub changes_only: bool,

    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdSync {
    pub const NAME: &str = "sync";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Push the planned shifts of a station month to the remote system")
            .arg(StationArgs::station())
            .arg(MonthArgs::month())
            .arg(MonthArgs::year())
            .arg(arg!(-a --all "Resend shifts whose remote state already matches"))
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            station: StationArgs::get_station(matches).unwrap_or_default(),
            scope: MonthArgs::from(matches),
            changes_only: !matches.get_flag("all"),

            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, sync: &ShiftSync) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "synchronizing station...");
        let scope = MonthScope::new(self.scope.year, self.scope.month)?;

        let cancel = CancelToken::new();
        let interrupt = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupted, stopping after the current shift");
                    cancel.cancel();
                }
            }
        });

        let (tx, mut rx) = mpsc::unbounded_channel();
        let progress = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                log_progress(&event);
            }
        });

        let ctx = SyncContext::new(self.station, scope)
            .changes_only(self.changes_only)
            .with_progress(tx)
            .with_cancel(cancel);
        let result = sync.sync_with(&ctx).await;

        drop(ctx);
        interrupt.abort();
        finish_progress(progress).await;

        let summary = result?;
        let formatter = UnitFormatter::new(self.verbose).with_output_format(self.output_format);
        print!("{}", formatter.format(&summary));
        Ok(())
    }
}

/// Waits for the progress logger, returns whether it ran to completion.
async fn finish_progress(progress: JoinHandle<()>) -> bool {
    match progress.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "progress logger stopped abnormally");
            false
        }
    }
}

fn log_progress(event: &SyncProgress) {
    match event {
        SyncProgress::Started {
            station_id,
            scope,
            keys,
        } => tracing::info!(station_id, %scope, keys, "sync started"),
        SyncProgress::UnitFinished(report) => tracing::info!(
            key = ?report.key,
            action = ?report.action,
            remote_id = ?report.remote_id,
            "shift finished"
        ),
        SyncProgress::Finished { cancelled } => tracing::info!(cancelled, "sync finished"),
    }
}
