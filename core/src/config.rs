// SPDX-FileCopyrightText: 2025 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::error::Error;
use std::path::{Path, PathBuf};

use shiftsync_remote::Credentials;

/// The name of the application.
pub const APP_NAME: &str = "shiftsync";

const ENV_REMOTE_URL: &str = "SHIFTSYNC_REMOTE_URL";
const ENV_AUTH_ID: &str = "SHIFTSYNC_AUTH_ID";
const ENV_AUTH_SECRET: &str = "SHIFTSYNC_AUTH_SECRET";

/// Configuration for the synchronization engine.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Config {
    /// Path to the SQLite database shared with the roster application.
    /// An in-memory database is used when unset.
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// Remote defaults, overridden per station.
    #[serde(default)]
    pub remote: RemoteDefaults,
}

/// Remote endpoint defaults applied to every station that does not set its own.
#[derive(Clone, Default, serde::Deserialize)]
pub struct RemoteDefaults {
    /// Base URL of the remote system.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Authentication id for the hook API.
    #[serde(default)]
    pub auth_id: Option<String>,

    /// Authentication secret for the hook API.
    #[serde(default)]
    pub auth_secret: Option<String>,

    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// User agent string.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl std::fmt::Debug for RemoteDefaults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteDefaults")
            .field("base_url", &self.base_url)
            .field("auth_id", &self.auth_id)
            .field("auth_secret", &self.auth_secret.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl RemoteDefaults {
    /// Default credentials, if both halves are set.
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.auth_id, &self.auth_secret) {
            (Some(id), Some(secret)) => Some(Credentials::new(id.clone(), secret.clone())),
            _ => None,
        }
    }
}

impl Config {
    /// Normalize the configuration: expand the database path and fill unset
    /// remote values from the environment.
    pub fn normalize(&mut self) -> Result<(), Box<dyn Error>> {
        if let Some(database) = &self.database {
            self.database = Some(
                expand_path(database)
                    .map_err(|e| format!("Failed to expand database path: {e}"))?,
            );
        }

        self.apply_env(|name| std::env::var(name).ok());
        Ok(())
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let remote = &mut self.remote;
        for (slot, name) in [
            (&mut remote.base_url, ENV_REMOTE_URL),
            (&mut remote.auth_id, ENV_AUTH_ID),
            (&mut remote.auth_secret, ENV_AUTH_SECRET),
        ] {
            if slot.is_none()
                && let Some(value) = lookup(name).filter(|v| !v.trim().is_empty())
            {
                tracing::debug!(name, "using remote setting from environment");
                *slot = Some(value);
            }
        }
    }
}

/// Handle tilde (~) and environment variables in the path
pub fn expand_path(path: &Path) -> Result<PathBuf, Box<dyn Error>> {
    if path.is_absolute() {
        return Ok(path.to_owned());
    }

    let path = path.to_str().ok_or("Invalid path")?;

    // Handle tilde and home directory
    let home_prefixes: &[&str] = if cfg!(unix) {
        &["~/", "$HOME/", "${HOME}/"]
    } else {
        &[r"~\", "~/", r"%UserProfile%\", r"%UserProfile%/"]
    };
    for prefix in home_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_home_dir()?.join(stripped));
        }
    }

    // Handle state directories
    let state_prefixes: &[&str] = if cfg!(unix) {
        &["$XDG_STATE_HOME/", "${XDG_STATE_HOME}/"]
    } else {
        &[r"%LOCALAPPDATA%\", "%LOCALAPPDATA%/"]
    };
    for prefix in state_prefixes {
        if let Some(stripped) = path.strip_prefix(prefix) {
            return Ok(get_state_dir()?.join(stripped));
        }
    }

    Ok(path.into())
}

/// The default database location, `<state dir>/shiftsync/shiftsync.db`.
pub fn default_database_path() -> Result<PathBuf, Box<dyn Error>> {
    Ok(get_state_dir()?.join(APP_NAME).join(format!("{APP_NAME}.db")))
}

fn get_home_dir() -> Result<PathBuf, Box<dyn Error>> {
    dirs::home_dir().ok_or_else(|| "User-specific home directory not found".into())
}

fn get_state_dir() -> Result<PathBuf, Box<dyn Error>> {
    #[cfg(unix)]
    let state_dir = xdg::BaseDirectories::new().get_state_home();
    #[cfg(windows)]
    let state_dir = dirs::data_local_dir();
    state_dir.ok_or_else(|| "User-specific state directory not found".into())
}
