// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// Errors raised while talking to the remote scheduling system.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Network or HTTP layer error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The remote rejected the credentials (401/403).
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Non-success HTTP status without an interpretable body.
    #[error("Remote API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The response body could not be interpreted.
    #[error("Invalid remote response: {0}")]
    InvalidResponse(String),

    /// Client configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

impl From<serde_json::Error> for RemoteError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}
