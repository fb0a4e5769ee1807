// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Client for the `ShiftPlanning` hook.

use std::sync::Arc;

use jiff::Timestamp;
use reqwest::StatusCode;

use crate::config::RemoteConfig;
use crate::error::RemoteError;
use crate::http::{HttpClient, RawReply};
use crate::request::ShiftPlanningRequest;
use crate::response::ShiftPlanningResponse;
use crate::types::SheetId;

const SHIFT_PLANNING_PATH: &str = "/comm-api/hooks/v1/ShiftPlanning";

/// Client for submitting shifts to the remote scheduling system.
///
/// # Example
///
/// ```ignore
/// use shiftsync_remote::{Credentials, RemoteClient, RemoteConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RemoteConfig::new(
///     "https://station.example.cloud",
///     Credentials::new("hook-id", "hook-secret"),
/// );
///
/// let client = RemoteClient::new(config)?;
/// let reachable = client.test_connection().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: Arc<HttpClient>,
    config: RemoteConfig,
}

impl RemoteClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or credentials are blank, or if HTTP
    /// client initialization fails.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        if config.base_url.trim().is_empty() {
            return Err(RemoteError::Config("base URL is empty".to_string()));
        }
        if config.credentials.is_incomplete() {
            return Err(RemoteError::Config("credentials are incomplete".to_string()));
        }

        let http = HttpClient::new(config.clone())?;
        Ok(Self {
            http: Arc::new(http),
            config,
        })
    }

    /// Returns the configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    /// Submits one shift object.
    ///
    /// The `result` field of a parseable body is authoritative: a rejection is
    /// returned as `Ok` with [`ShiftResult::Error`](crate::ShiftResult::Error),
    /// even if it arrives with a non-2xx status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the credentials are refused, or
    /// the body cannot be interpreted.
    pub async fn submit(
        &self,
        request: &ShiftPlanningRequest,
    ) -> Result<ShiftPlanningResponse, RemoteError> {
        let url = self.endpoint();
        tracing::debug!(
            %url,
            sheet = %request.shift_sheet,
            shift = ?request.shift,
            assignments = request.assignments.len(),
            "submitting shift"
        );

        let reply = self
            .http
            .execute(self.http.post(&url).json(request))
            .await?;

        let resp = interpret(reply)?;
        tracing::debug!(
            result = ?resp.result,
            shift = ?resp.shift(),
            warnings = resp.warning_feedback.len(),
            errors = resp.error_feedback.len(),
            "remote replied"
        );
        Ok(resp)
    }

    /// Checks that the remote accepts the configured credentials.
    ///
    /// A dummy submission is sent; it is expected to be rejected on validation
    /// grounds, so only 401 and 403 count as failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn test_connection(&self) -> Result<bool, RemoteError> {
        let now = Timestamp::now();
        let probe = ShiftPlanningRequest {
            shift_sheet: SheetId::from("test"),
            shift: None,
            start: now,
            end: now,
            assignments: Vec::new(),
        };

        let reply = self
            .http
            .execute(self.http.post(&self.endpoint()).json(&probe))
            .await?;

        let ok = !matches!(reply.status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN);
        tracing::info!(status = %reply.status, ok, "connection test finished");
        Ok(ok)
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            SHIFT_PLANNING_PATH
        )
    }
}

fn interpret(reply: RawReply) -> Result<ShiftPlanningResponse, RemoteError> {
    match ShiftPlanningResponse::from_json(&reply.body) {
        Ok(resp) => {
            if !reply.status.is_success() {
                tracing::warn!(status = %reply.status, result = ?resp.result, "remote body overrides HTTP status");
            }
            Ok(resp)
        }
        Err(e) => match reply.status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(RemoteError::Auth(format!("{}: {}", reply.status, reply.body)))
            }
            status if status.is_success() => Err(RemoteError::InvalidResponse(e.to_string())),
            status => Err(RemoteError::Status {
                status: status.as_u16(),
                body: reply.body,
            }),
        },
    }
}
