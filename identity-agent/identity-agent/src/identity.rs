// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use collector::{Tier, UNKNOWN};
use serde::Serialize;
use std::fmt;

use crate::app_metadata::AppMetadata;

/// Where the hwid material came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum IdentitySource {
    /// A platform tier produced the material.
    Tier { tier: Tier },

    /// Every tier failed. `deterministic` is false when the material includes
    /// the per-process nonce, in which case the hwid changes across restarts.
    LastResort { deterministic: bool },
}

impl IdentitySource {
    pub fn is_degraded(&self) -> bool {
        matches!(self, IdentitySource::LastResort { .. })
    }
}

impl fmt::Display for IdentitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentitySource::Tier { tier } => write!(f, "tier {tier}"),
            IdentitySource::LastResort { deterministic: true } => {
                write!(f, "last resort (host name)")
            }
            IdentitySource::LastResort {
                deterministic: false,
            } => write!(f, "last resort (process nonce)"),
        }
    }
}

/// Resolved identity of the running device. Every field is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceIdentity {
    pub hwid: String,
    #[serde(rename = "deviceOS")]
    pub device_os: String,
    pub os_version: String,
    pub device_model: String,
    pub user_agent: String,
    pub source: IdentitySource,
}

impl DeviceIdentity {
    pub fn new(
        hwid: String,
        device_os: &str,
        os_version: &str,
        device_model: &str,
        app: &dyn AppMetadata,
        source: IdentitySource,
    ) -> Self {
        let device_os = placeholder_if_empty(device_os);
        let os_version = placeholder_if_empty(os_version);
        let device_model = placeholder_if_empty(device_model);
        let user_agent = user_agent(
            &placeholder_if_empty(&app.name()),
            &placeholder_if_empty(&app.version()),
            &device_os,
            &os_version,
            &device_model,
        );

        Self {
            hwid,
            device_os,
            os_version,
            device_model,
            user_agent,
            source,
        }
    }
}

/// `<AppName>/<AppVersion> (<deviceOS> <osVersion>; <deviceModel>)`
pub fn user_agent(
    app_name: &str,
    app_version: &str,
    device_os: &str,
    os_version: &str,
    device_model: &str,
) -> String {
    format!("{app_name}/{app_version} ({device_os} {os_version}; {device_model})")
}

fn placeholder_if_empty(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        UNKNOWN.to_string()
    } else {
        value.to_string()
    }
}
