// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use collector::Platform;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/device-identity.conf";

pub const DEFAULT_APP_NAME: &str = "device-identity";
pub const DEFAULT_APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Upper bound for a single external utility run. A hung `wmic` or
/// `system_profiler` counts as a failed tier once this expires.
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 5;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    /// Application reported in the user agent
    #[serde(default)]
    pub app: AppConfig,

    /// Host probing knobs
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Force a platform variant instead of detecting the running one
    #[serde(default)]
    pub platform: Option<Platform>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct AppConfig {
    pub name: String,
    pub version: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_APP_NAME.to_string(),
            version: DEFAULT_APP_VERSION.to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ProbeConfig {
    /// Timeout for each external command, in seconds
    pub command_timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
        }
    }
}

impl ProbeConfig {
    pub fn command_timeout(&self) -> Duration {
        match self.command_timeout_secs {
            0 => Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS),
            secs => Duration::from_secs(secs),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            app: AppConfig::default(),
            probe: ProbeConfig::default(),
            platform: None,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<&str> for Config {
    type Error = config::ConfigError;
    fn try_from(config_path: &str) -> Result<Self, Self::Error> {
        let c = config::Config::builder()
            .add_source(config::File::with_name(config_path))
            .set_default("app.name", DEFAULT_APP_NAME)?
            .set_default("app.version", DEFAULT_APP_VERSION)?
            .set_default("probe.command_timeout_secs", DEFAULT_COMMAND_TIMEOUT_SECS)?
            .build()?;

        let cfg = c.try_deserialize()?;
        Ok(cfg)
    }
}
