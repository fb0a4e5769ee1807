// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Temporary directory management for integration tests.

use std::path::PathBuf;

use tempfile::TempDir;

/// Temporary state directory holding a database file.
///
/// The directory is removed when dropped.
#[derive(Debug)]
pub struct TempState {
    dir: TempDir,
}

impl TempState {
    /// Creates a new temporary state directory.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    /// Path of the database file inside the directory.
    #[must_use]
    pub fn database(&self) -> PathBuf {
        self.dir.path().join("roster.db")
    }

    /// Writes a configuration file and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_config(&self, content: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = self.dir.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok(path)
    }
}
