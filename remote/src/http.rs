// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper with Basic authentication.

use reqwest::{Client, RequestBuilder, StatusCode};

use crate::config::RemoteConfig;
use crate::error::RemoteError;

/// Raw HTTP reply, kept unparsed so the caller decides which of status and
/// body is authoritative.
#[derive(Debug)]
pub struct RawReply {
    pub status: StatusCode,
    pub body: String,
}

/// HTTP client for the remote hook API.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    config: RemoteConfig,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn new(config: RemoteConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, config })
    }

    /// Builds a POST request with the authorization header set.
    pub fn post(&self, url: &str) -> RequestBuilder {
        let creds = &self.config.credentials;
        self.client
            .post(url)
            .basic_auth(&creds.auth_id, Some(&creds.auth_secret))
            .header("Accept", "application/json")
    }

    /// Executes a request and returns status and body without judging them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or the body cannot be read.
    pub async fn execute(&self, req: RequestBuilder) -> Result<RawReply, RemoteError> {
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        Ok(RawReply { status, body })
    }
}
