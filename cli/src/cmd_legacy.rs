// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command};
use colored::Colorize;
use shiftsync_core::ShiftSync;

use crate::arg::{CommonArgs, StationArgs};
use crate::util::OutputFormat;

#[derive(Debug, Clone, Copy)]
pub struct CmdCleanupLegacy {
    pub station: Option<i64>,
    pub output_format: OutputFormat,
}

impl CmdCleanupLegacy {
    pub const NAME: &str = "cleanup-legacy";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Delete local sync records written without a snapshot")
            .long_about(
                "\
Delete local sync records written without a snapshot. Nothing is sent to the \
remote system; shifts those records pointed at are left as they are.",
            )
            .arg(StationArgs::optional_station())
            .arg(CommonArgs::output_format())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            station: StationArgs::get_station(matches),
            output_format: CommonArgs::get_output_format(matches),
        }
    }

    pub async fn run(self, sync: &ShiftSync) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "cleaning up legacy records...");
        let cleanup = sync.cleanup_legacy(self.station).await?;

        match self.output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&cleanup)?),
            OutputFormat::Table => {
                println!("Deleted {} legacy records", cleanup.deleted);
                if cleanup.failed > 0 {
                    println!("{} {} records could not be deleted", "Error:".red(), cleanup.failed);
                    for error in &cleanup.errors {
                        println!("  {error}");
                    }
                }
            }
        }
        Ok(())
    }
}
