// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Translation of assignment units into `ShiftPlanning` submissions.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use shiftsync_remote::{
    Credentials, PersonId, RemoteClient, RemoteConfig, RemoteError, SheetId, ShiftAssignment,
    ShiftId, ShiftPlanningRequest, ShiftPlanningResponse, default_timeout, default_user_agent,
};
use tokio::sync::Mutex;

use crate::config::RemoteDefaults;
use crate::error::SyncError;
use crate::grouper::AssignmentUnit;
use crate::localdb::{PositionSlot, StationRecord};

/// Maximum number of positional slots of a remote shift.
pub const MAX_POSITIONS: usize = 3;

/// Transport seam for submissions to the remote system.
#[async_trait]
pub trait ShiftPlanner: Send + Sync + Debug {
    /// Submits one shift object.
    async fn submit(
        &self,
        config: &RemoteConfig,
        request: &ShiftPlanningRequest,
    ) -> Result<ShiftPlanningResponse, RemoteError>;

    /// Checks that the remote accepts the credentials.
    async fn test_connection(&self, config: &RemoteConfig) -> Result<bool, RemoteError>;
}

/// [`ShiftPlanner`] over HTTP, reusing one client per endpoint and credentials.
#[derive(Debug, Default)]
pub struct HttpShiftPlanner {
    clients: Mutex<HashMap<(String, String, String), RemoteClient>>,
}

impl HttpShiftPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    async fn client(&self, config: &RemoteConfig) -> Result<RemoteClient, RemoteError> {
        let key = (
            config.base_url.clone(),
            config.credentials.auth_id.clone(),
            config.credentials.auth_secret.clone(),
        );

        let mut clients = self.clients.lock().await;
        if let Some(client) = clients.get(&key) {
            return Ok(client.clone());
        }

        tracing::debug!(base_url = %config.base_url, "creating remote client");
        let client = RemoteClient::new(config.clone())?;
        clients.insert(key, client.clone());
        Ok(client)
    }
}

#[async_trait]
impl ShiftPlanner for HttpShiftPlanner {
    async fn submit(
        &self,
        config: &RemoteConfig,
        request: &ShiftPlanningRequest,
    ) -> Result<ShiftPlanningResponse, RemoteError> {
        self.client(config).await?.submit(request).await
    }

    async fn test_connection(&self, config: &RemoteConfig) -> Result<bool, RemoteError> {
        self.client(config).await?.test_connection().await
    }
}

/// Remote settings of a station, with configured defaults applied.
#[derive(Debug, Clone)]
pub struct StationConfig {
    pub station_id: i64,
    pub enabled: bool,
    pub base_url: Option<String>,
    pub credentials: Option<Credentials>,
    pub shift_sheet: Option<SheetId>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl StationConfig {
    /// Merges a station row over the defaults; blank values count as unset.
    pub fn resolve(record: &StationRecord, defaults: &RemoteDefaults) -> Self {
        let base_url = non_blank(record.base_url.as_deref())
            .or_else(|| non_blank(defaults.base_url.as_deref()));
        let auth_id = non_blank(record.auth_id.as_deref())
            .or_else(|| non_blank(defaults.auth_id.as_deref()));
        let auth_secret = non_blank(record.auth_secret.as_deref())
            .or_else(|| non_blank(defaults.auth_secret.as_deref()));

        let credentials = match (auth_id, auth_secret) {
            (Some(id), Some(secret)) => Some(Credentials::new(id, secret)),
            _ => None,
        };

        Self {
            station_id: record.station_id,
            enabled: record.enabled,
            base_url,
            credentials,
            shift_sheet: non_blank(record.shift_sheet.as_deref()).map(SheetId::from),
            timeout_secs: defaults.timeout_secs.unwrap_or_else(default_timeout),
            user_agent: defaults
                .user_agent
                .clone()
                .unwrap_or_else(default_user_agent),
        }
    }

    /// Endpoint and credentials, or the first one missing.
    pub fn remote_config(&self) -> Result<RemoteConfig, SyncError> {
        let base_url = self.base_url.as_ref().ok_or_else(|| {
            SyncError::Configuration(format!(
                "station {} has no remote endpoint configured",
                self.station_id
            ))
        })?;
        let credentials = self
            .credentials
            .as_ref()
            .filter(|c| !c.is_incomplete())
            .ok_or_else(|| {
                SyncError::Configuration(format!(
                    "station {} has no remote credentials configured",
                    self.station_id
                ))
            })?;

        Ok(RemoteConfig {
            base_url: base_url.clone(),
            credentials: credentials.clone(),
            timeout_secs: self.timeout_secs,
            user_agent: self.user_agent.clone(),
        })
    }

    fn sheet(&self) -> Result<&SheetId, SyncError> {
        self.shift_sheet.as_ref().ok_or_else(|| {
            SyncError::Configuration(format!(
                "station {} has no shift sheet configured",
                self.station_id
            ))
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOutcome {
    /// Id of the remote shift.
    pub remote_id: ShiftId,
    /// Non-blocking remarks of the remote.
    pub warnings: Vec<String>,
}

/// Validates and sends units through a [`ShiftPlanner`].
#[derive(Debug, Clone)]
pub struct RemoteAdapter {
    planner: Arc<dyn ShiftPlanner>,
}

impl RemoteAdapter {
    pub fn new(planner: Arc<dyn ShiftPlanner>) -> Self {
        Self { planner }
    }

    /// Creates or updates the remote shift of a unit.
    ///
    /// Preconditions are checked in order before any call: endpoint,
    /// credentials, sheet, assignee count, user mappings, position mappings.
    pub async fn send(
        &self,
        unit: &AssignmentUnit,
        station: &StationConfig,
        users: &HashMap<i64, PersonId>,
        positions: &HashMap<u8, PositionSlot>,
        existing: Option<&ShiftId>,
    ) -> Result<RemoteOutcome, SyncError> {
        let config = station.remote_config()?;
        let sheet = station.sheet()?;

        let count = unit.assignee_ids.len();
        if count == 0 || count > MAX_POSITIONS {
            return Err(SyncError::Configuration(format!(
                "a shift takes 1 to {MAX_POSITIONS} assignees, got {count}"
            )));
        }

        let persons = unit
            .assignee_ids
            .iter()
            .map(|user_id| {
                users.get(user_id).cloned().ok_or_else(|| {
                    SyncError::Mapping(format!("user {user_id} has no remote person mapping"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut assignments = Vec::with_capacity(count);
        for (index, person) in (1u8..).zip(persons) {
            let slot = positions.get(&index).ok_or_else(|| {
                SyncError::Mapping(format!(
                    "station {} has no remote position mapped to slot {index}",
                    station.station_id
                ))
            })?;
            if slot.requires_qualification {
                tracing::debug!(slot = index, %person, "slot is qualification checked remotely");
            }
            assignments.push(ShiftAssignment {
                position: slot.position_id.clone(),
                person,
            });
        }

        let request = ShiftPlanningRequest {
            shift_sheet: sheet.clone(),
            shift: existing.cloned(),
            start: unit.start,
            end: unit.end,
            assignments,
        };
        self.submit(&config, &request).await
    }

    /// Clears the remote shift: the same id with no assignments.
    pub async fn clear(
        &self,
        start: Timestamp,
        end: Timestamp,
        station: &StationConfig,
        existing: &ShiftId,
    ) -> Result<RemoteOutcome, SyncError> {
        let config = station.remote_config()?;
        let sheet = station.sheet()?;

        let request = ShiftPlanningRequest {
            shift_sheet: sheet.clone(),
            shift: Some(existing.clone()),
            start,
            end,
            assignments: Vec::new(),
        };
        self.submit(&config, &request).await
    }

    /// Checks the endpoint and credentials of a station.
    pub async fn test_connection(&self, station: &StationConfig) -> Result<bool, SyncError> {
        let config = station.remote_config()?;
        Ok(self.planner.test_connection(&config).await?)
    }

    async fn submit(
        &self,
        config: &RemoteConfig,
        request: &ShiftPlanningRequest,
    ) -> Result<RemoteOutcome, SyncError> {
        let resp = self.planner.submit(config, request).await?;

        if !resp.is_success() {
            let message = if resp.error_feedback.is_empty() {
                "remote reported an error without feedback".to_string()
            } else {
                resp.error_feedback.join("; ")
            };
            return Err(SyncError::RemoteRejection(message));
        }

        for warning in &resp.warning_feedback {
            tracing::warn!(shift = ?request.shift, warning, "remote accepted with warning");
        }

        let remote_id = resp
            .shift()
            .or(request.shift.as_ref())
            .cloned()
            .ok_or_else(|| {
                SyncError::Transport("remote accepted the shift but returned no id".to_string())
            })?;

        Ok(RemoteOutcome {
            remote_id,
            warnings: resp.warning_feedback,
        })
    }
}
