// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use async_trait::async_trait;

use crate::utils::{non_empty, os_name_version};
use crate::{unsupported, Platform, SignalCollector, SystemProbe, Tier, TierResult};

/// Hosts without a dedicated identity source: BSDs, illumos and friends.
#[derive(Debug, Default)]
pub struct OtherCollector {}

#[async_trait]
impl SignalCollector for OtherCollector {
    fn platform(&self) -> Platform {
        Platform::Other
    }

    fn tiers(&self) -> Vec<Tier> {
        vec![Tier::OsNameVersion]
    }

    async fn collect_raw_identifier(&self, tier: Tier, probe: &dyn SystemProbe) -> TierResult {
        match tier {
            Tier::OsNameVersion => os_name_version(probe),
            other => Err(unsupported(other, Platform::Other)),
        }
    }

    async fn collect_os_version(&self, probe: &dyn SystemProbe) -> TierResult {
        non_empty("uname release", &probe.os_release()?.release)
    }

    async fn collect_model(&self, probe: &dyn SystemProbe) -> TierResult {
        non_empty("uname machine", &probe.os_release()?.machine)
    }
}
