// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, fmt};

use colored::{Color, Colorize};
use jiff::tz::TimeZone;
use shiftsync_core::{LogicalShiftKey, SyncSummary, UnitAction, UnitReport};

use crate::table::{Table, TableColumn};
use crate::util::{OutputFormat, ellipsize};

const DETAIL_WIDTH: usize = 60;

#[derive(Debug)]
pub struct UnitFormatter {
    columns: Vec<UnitColumn>,
    format: OutputFormat,
}

impl UnitFormatter {
    pub fn new(verbose: bool) -> Self {
        Self {
            columns: vec![
                UnitColumn::Shift,
                UnitColumn::Rows,
                UnitColumn::Action,
                UnitColumn::Remote,
                UnitColumn::Detail { full: verbose },
            ],
            format: OutputFormat::Table,
        }
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format<'a>(&'a self, summary: &'a SyncSummary) -> Display<'a> {
        Display {
            summary,
            formatter: self,
        }
    }
}

#[derive(Debug)]
pub struct Display<'a> {
    summary: &'a SyncSummary,
    formatter: &'a UnitFormatter,
}

impl fmt::Display for Display<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.formatter.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(self.summary).map_err(|_| fmt::Error)?;
                writeln!(f, "{json}")
            }
            OutputFormat::Table => {
                if !self.summary.units.is_empty() {
                    write!(
                        f,
                        "{}",
                        Table::new(&self.formatter.columns, &self.summary.units)
                    )?;
                    writeln!(f)?;
                }
                writeln!(f, "{}", totals(self.summary))
            }
        }
    }
}

fn totals(summary: &SyncSummary) -> String {
    let mut line = format!(
        "synced {} (updated {}), skipped {}, errors {}, cleared {}, clear errors {}",
        summary.synced,
        summary.updated,
        summary.skipped,
        summary.errors,
        summary.deleted,
        summary.delete_errors,
    );
    if summary.guarded > 0 {
        line.push_str(&format!(", guarded {}", summary.guarded));
    }
    if summary.cancelled {
        line.push_str(", cancelled");
    }

    if summary.is_success() {
        line.green().to_string()
    } else {
        line.red().to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub enum UnitColumn {
    Shift,
    Rows,
    Action,
    Remote,
    Detail { full: bool },
}

impl TableColumn<UnitReport> for UnitColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            UnitColumn::Shift => "Shift",
            UnitColumn::Rows => "Rows",
            UnitColumn::Action => "Action",
            UnitColumn::Remote => "Remote",
            UnitColumn::Detail { .. } => "Detail",
        }
        .into()
    }

    fn format<'a>(&self, data: &'a UnitReport) -> Cow<'a, str> {
        match self {
            UnitColumn::Shift => match &data.key {
                Some(key) => format_key(key).into(),
                None => "legacy".into(),
            },
            UnitColumn::Rows => join_ids(&data.local_shift_ids).into(),
            UnitColumn::Action => action_label(&data.action).into(),
            UnitColumn::Remote => data
                .remote_id
                .as_ref()
                .map_or(Cow::Borrowed(""), |id| id.as_str().into()),
            UnitColumn::Detail { full } => {
                let detail = detail(data);
                if *full {
                    detail.into()
                } else {
                    ellipsize(&detail, DETAIL_WIDTH).into()
                }
            }
        }
    }

    fn color(&self, data: &UnitReport) -> Option<Color> {
        match self {
            UnitColumn::Action => action_color(&data.action),
            _ => None,
        }
    }
}

fn format_key(key: &LogicalShiftKey) -> String {
    let tz = TimeZone::system();
    let hm = |ts: jiff::Timestamp| ts.to_zoned(tz.clone()).strftime("%H:%M").to_string();
    match (key.split_start, key.split_end) {
        (Some(start), Some(end)) => {
            format!("{} {} {}~{}", key.date, key.kind, hm(start), hm(end))
        }
        _ => format!("{} {}", key.date, key.kind),
    }
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn action_label(action: &UnitAction) -> &'static str {
    match action {
        UnitAction::Created => "created",
        UnitAction::Updated => "updated",
        UnitAction::Unchanged => "unchanged",
        UnitAction::Cleared => "cleared",
        UnitAction::Skipped { .. } => "skipped",
        UnitAction::GuardSkipped { .. } => "guarded",
        UnitAction::Failed { .. } => "failed",
        UnitAction::ClearFailed { .. } => "clear failed",
    }
}

fn action_color(action: &UnitAction) -> Option<Color> {
    match action {
        UnitAction::Created | UnitAction::Updated | UnitAction::Cleared => Some(Color::Green),
        UnitAction::Skipped { .. } | UnitAction::GuardSkipped { .. } => Some(Color::Yellow),
        UnitAction::Failed { .. } | UnitAction::ClearFailed { .. } => Some(Color::Red),
        UnitAction::Unchanged => None,
    }
}

fn detail(data: &UnitReport) -> String {
    match &data.action {
        UnitAction::Skipped { reason } | UnitAction::GuardSkipped { reason } => reason.clone(),
        UnitAction::Failed { message, .. } | UnitAction::ClearFailed { message, .. } => {
            message.clone()
        }
        _ => data.warnings.join("; "),
    }
}
