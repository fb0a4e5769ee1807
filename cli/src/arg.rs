// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use clap::{Arg, ArgMatches, arg, value_parser};
use clap_num::number_range;

use crate::util::{OutputFormat, current_month};

#[derive(Debug, Clone, Copy)]
pub struct CommonArgs;

impl CommonArgs {
    pub fn verbose() -> Arg {
        arg!(-v --verbose "Show more detailed information")
    }

    pub fn get_verbose(matches: &ArgMatches) -> bool {
        matches.get_flag("verbose")
    }

    pub fn output_format() -> Arg {
        arg!(--"output-format" <FORMAT> "Output format")
            .value_parser(value_parser!(OutputFormat))
            .default_value("table")
    }

    pub fn get_output_format(matches: &ArgMatches) -> OutputFormat {
        matches
            .get_one("output-format")
            .copied()
            .unwrap_or(OutputFormat::Table)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StationArgs;

impl StationArgs {
    pub fn station() -> Arg {
        arg!(-s --station <STATION> "Id of the station")
            .value_parser(value_parser!(i64))
            .required(true)
    }

    pub fn optional_station() -> Arg {
        arg!(-s --station <STATION> "Only this station").value_parser(value_parser!(i64))
    }

    pub fn get_station(matches: &ArgMatches) -> Option<i64> {
        matches.get_one("station").copied()
    }
}

/// The month a command works on, defaulting to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthArgs {
    pub year: i16,
    pub month: i8,
}

impl MonthArgs {
    pub fn month() -> Arg {
        fn from_1_to_12(s: &str) -> Result<i8, String> {
            number_range(s, 1, 12)
        }

        arg!(-m --month <MONTH> "Month to work on (1-12), defaults to the current month")
            .value_parser(from_1_to_12)
    }

    pub fn year() -> Arg {
        arg!(-y --year <YEAR> "Year to work on, defaults to the current year")
            .value_parser(value_parser!(i16).range(1..=9999))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        let (year, month) = current_month();
        Self {
            year: matches.get_one("year").copied().unwrap_or(year),
            month: matches.get_one("month").copied().unwrap_or(month),
        }
    }
}
