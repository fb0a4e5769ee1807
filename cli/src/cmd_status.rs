// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command};
use shiftsync_core::ShiftSync;

use crate::arg::{CommonArgs, MonthArgs, StationArgs};
use crate::record_formatter::RecordFormatter;
use crate::util::OutputFormat;

#[derive(Debug, Clone)]
pub struct CmdStatus {
    pub station: i64,
    pub scope: MonthArgs,

    pub output_format: OutputFormat,
    pub verbose: bool,
}

impl CmdStatus {
    pub const NAME: &str = "status";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Show the sync records of a station month")
            .arg(StationArgs::station())
            .arg(MonthArgs::month())
            .arg(MonthArgs::year())
            .arg(CommonArgs::output_format())
            .arg(CommonArgs::verbose())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            station: StationArgs::get_station(matches).unwrap_or_default(),
            scope: MonthArgs::from(matches),

            output_format: CommonArgs::get_output_format(matches),
            verbose: CommonArgs::get_verbose(matches),
        }
    }

    pub async fn run(self, sync: &ShiftSync) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "listing sync records...");
        let records = sync
            .status(self.station, self.scope.month, self.scope.year)
            .await?;

        let formatter = RecordFormatter::new(self.verbose).with_output_format(self.output_format);
        print!("{}", formatter.format(&records));
        Ok(())
    }
}
