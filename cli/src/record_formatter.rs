// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{borrow::Cow, fmt};

use colored::Color;
use shiftsync_core::{SyncRecord, SyncStatus};

use crate::table::{PaddingDirection, Table, TableColumn};
use crate::util::{OutputFormat, ellipsize, format_timestamp};

#[derive(Debug)]
pub struct RecordFormatter {
    columns: Vec<RecordColumn>,
    format: OutputFormat,
}

impl RecordFormatter {
    pub fn new(verbose: bool) -> Self {
        Self {
            columns: vec![
                RecordColumn::Row,
                RecordColumn::Status,
                RecordColumn::Remote,
                RecordColumn::Assignees,
                RecordColumn::SyncedAt,
                RecordColumn::Message { full: verbose },
            ],
            format: OutputFormat::Table,
        }
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format<'a>(&'a self, records: &'a [SyncRecord]) -> Display<'a> {
        Display {
            records,
            formatter: self,
        }
    }
}

#[derive(Debug)]
pub struct Display<'a> {
    records: &'a [SyncRecord],
    formatter: &'a RecordFormatter,
}

impl fmt::Display for Display<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.formatter.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(self.records).map_err(|_| fmt::Error)?;
                writeln!(f, "{json}")
            }
            OutputFormat::Table if self.records.is_empty() => writeln!(f, "No sync records"),
            OutputFormat::Table => write!(
                f,
                "{}",
                Table::new(&self.formatter.columns, self.records)
            ),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum RecordColumn {
    Row,
    Status,
    Remote,
    Assignees,
    SyncedAt,
    Message { full: bool },
}

impl TableColumn<SyncRecord> for RecordColumn {
    fn name(&self) -> Cow<'_, str> {
        match self {
            RecordColumn::Row => "Row",
            RecordColumn::Status => "Status",
            RecordColumn::Remote => "Remote",
            RecordColumn::Assignees => "Assignees",
            RecordColumn::SyncedAt => "Synced At",
            RecordColumn::Message { .. } => "Message",
        }
        .into()
    }

    fn format<'a>(&self, data: &'a SyncRecord) -> Cow<'a, str> {
        match self {
            RecordColumn::Row => data.local_shift_id.to_string().into(),
            RecordColumn::Status if data.is_legacy() => "legacy".into(),
            RecordColumn::Status => data.status.as_str().into(),
            RecordColumn::Remote => data
                .remote_shift_id
                .as_ref()
                .map_or(Cow::Borrowed(""), |id| id.as_str().into()),
            RecordColumn::Assignees => data
                .assigned_user_ids
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(",")
                .into(),
            RecordColumn::SyncedAt => data
                .synced_at
                .map_or(Cow::Borrowed(""), |ts| format_timestamp(ts).into()),
            RecordColumn::Message { full } => {
                let message = match &data.error_message {
                    Some(message) => message.clone(),
                    None => data.warnings.join("; "),
                };
                if *full {
                    message.into()
                } else {
                    ellipsize(&message, 60).into()
                }
            }
        }
    }

    fn padding_direction(&self) -> PaddingDirection {
        match self {
            RecordColumn::Row => PaddingDirection::Right,
            _ => PaddingDirection::Left,
        }
    }

    fn color(&self, data: &SyncRecord) -> Option<Color> {
        match self {
            RecordColumn::Status if data.is_legacy() => Some(Color::Yellow),
            RecordColumn::Status => match data.status {
                SyncStatus::Success => Some(Color::Green),
                SyncStatus::Error => Some(Color::Red),
                SyncStatus::Pending => None,
            },
            _ => None,
        }
    }
}
