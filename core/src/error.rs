// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use shiftsync_remote::RemoteError;

/// Errors raised by the synchronization engine.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Missing endpoint, credentials, sheet or slot limit violation.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An assignee or position has no remote mapping.
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Network or HTTP failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote answered `result = "Error"`; the feedback is kept verbatim.
    #[error("Remote rejected the shift: {0}")]
    RemoteRejection(String),

    /// Local store failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Local schema migration failure.
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Classification of a [`SyncError`], kept in per-unit reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`SyncError::Configuration`].
    Configuration,
    /// See [`SyncError::Mapping`].
    Mapping,
    /// See [`SyncError::Transport`].
    Transport,
    /// See [`SyncError::RemoteRejection`].
    RemoteRejection,
    /// Local store failures.
    Database,
}

impl SyncError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Mapping(_) => ErrorKind::Mapping,
            Self::Transport(_) => ErrorKind::Transport,
            Self::RemoteRejection(_) => ErrorKind::RemoteRejection,
            Self::Database(_) | Self::Migrate(_) => ErrorKind::Database,
        }
    }
}

impl From<RemoteError> for SyncError {
    fn from(e: RemoteError) -> Self {
        match e {
            RemoteError::Config(msg) => Self::Configuration(msg),
            other => Self::Transport(other.to_string()),
        }
    }
}
