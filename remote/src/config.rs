// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Credential pair sent as an HTTP Basic authorization header.
#[derive(Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Credentials {
    /// Authentication id (the Basic user name).
    pub auth_id: String,
    /// Authentication secret (the Basic password).
    pub auth_secret: String,
}

impl Credentials {
    /// Creates a credential pair.
    #[must_use]
    pub fn new(auth_id: impl Into<String>, auth_secret: impl Into<String>) -> Self {
        Self {
            auth_id: auth_id.into(),
            auth_secret: auth_secret.into(),
        }
    }

    /// Returns true if either half of the pair is blank.
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.auth_id.trim().is_empty() || self.auth_secret.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_id", &self.auth_id)
            .field("auth_secret", &"[REDACTED]")
            .finish()
    }
}

/// Remote endpoint configuration.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the remote system, e.g. `https://station.example.cloud`.
    pub base_url: String,
    /// Credentials for the hook API.
    pub credentials: Credentials,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl RemoteConfig {
    /// Creates a configuration with default timeout and user agent.
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Default request timeout in seconds.
#[must_use]
pub const fn default_timeout() -> u64 {
    30
}

/// Default user agent, `shiftsync-remote/<version>`.
#[must_use]
pub fn default_user_agent() -> String {
    concat!("shiftsync-remote/", env!("CARGO_PKG_VERSION")).to_string()
}
