// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use crate::config::AppConfig;

/// Name and version of the application embedding the identity service.
/// Only used to build the user agent.
pub trait AppMetadata: Send + Sync {
    fn name(&self) -> String;

    fn version(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAppMetadata {
    name: String,
    version: String,
}

impl StaticAppMetadata {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Default for StaticAppMetadata {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for StaticAppMetadata {
    fn from(config: &AppConfig) -> Self {
        Self::new(config.name.clone(), config.version.clone())
    }
}

impl AppMetadata for StaticAppMetadata {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn version(&self) -> String {
        self.version.clone()
    }
}
