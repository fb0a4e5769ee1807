// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Response body of the `ShiftPlanning` hook.

use serde::{Deserialize, Deserializer};

use crate::types::ShiftId;

/// Application-level outcome reported by the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ShiftResult {
    /// The submission was accepted.
    Success,
    /// The submission was rejected; see `errorFeedback`.
    Error,
}

/// Reply to a submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftPlanningResponse {
    /// Authoritative outcome, regardless of the HTTP status.
    pub result: ShiftResult,
    /// Non-blocking remarks.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub warning_feedback: Vec<String>,
    /// Reasons for a rejection.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub error_feedback: Vec<String>,
    /// Id of the created or updated shift.
    #[serde(default)]
    shift: Option<ShiftId>,
}

impl ShiftPlanningResponse {
    /// Creates a successful reply.
    #[must_use]
    pub fn success(shift: Option<ShiftId>, warning_feedback: Vec<String>) -> Self {
        Self {
            result: ShiftResult::Success,
            warning_feedback,
            error_feedback: Vec::new(),
            shift,
        }
    }

    /// Creates a rejection.
    #[must_use]
    pub fn rejected(error_feedback: Vec<String>) -> Self {
        Self {
            result: ShiftResult::Error,
            warning_feedback: Vec::new(),
            error_feedback,
            shift: None,
        }
    }

    /// Returns true if the remote accepted the submission.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.result == ShiftResult::Success
    }

    /// Returns the shift id, ignoring blank values.
    #[must_use]
    pub fn shift(&self) -> Option<&ShiftId> {
        self.shift.as_ref().filter(|id| !id.trim().is_empty())
    }

    /// Parses a response body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not a valid response document.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
