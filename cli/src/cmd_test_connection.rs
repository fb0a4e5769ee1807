// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;

use clap::{ArgMatches, Command};
use colored::Colorize;
use shiftsync_core::ShiftSync;

use crate::arg::StationArgs;

#[derive(Debug, Clone, Copy)]
pub struct CmdTestConnection {
    pub station: i64,
}

impl CmdTestConnection {
    pub const NAME: &str = "test-connection";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Check the remote endpoint and credentials of a station")
            .arg(StationArgs::station())
    }

    pub fn from(matches: &ArgMatches) -> Self {
        Self {
            station: StationArgs::get_station(matches).unwrap_or_default(),
        }
    }

    pub async fn run(self, sync: &ShiftSync) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "testing connection...");
        let station = sync.station_config(self.station).await?;
        let ok = sync.test_connection(self.station).await?;

        let endpoint = station.base_url.as_deref().unwrap_or("-");
        if ok {
            println!("{} station {} at {}", "Connected:".green(), self.station, endpoint);
        } else {
            println!(
                "{} station {} at {}: credentials were refused",
                "Failed:".red(),
                self.station,
                endpoint
            );
        }
        Ok(())
    }
}
