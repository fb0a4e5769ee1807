// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Client for the `ShiftPlanning` hook of the external scheduling system.
//!
//! One request creates or updates exactly one remote shift object together with
//! its positional assignments. Sending an existing shift id with an empty
//! assignment list clears the object without deleting it.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(clippy::similar_names, clippy::single_match_else)]

mod client;
mod config;
mod error;
mod http;
mod request;
mod response;
mod types;

pub use crate::client::RemoteClient;
pub use crate::config::{Credentials, RemoteConfig, default_timeout, default_user_agent};
pub use crate::error::RemoteError;
pub use crate::request::{ShiftAssignment, ShiftPlanningRequest};
pub use crate::response::{ShiftPlanningResponse, ShiftResult};
pub use crate::types::{PersonId, PositionId, SheetId, ShiftId};
