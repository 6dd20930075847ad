// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use async_trait::async_trait;

use crate::utils::{non_empty, reject_placeholder};
use crate::{unsupported, Platform, SignalCollector, SystemProbe, Tier, TierResult};

/// iOS processes cannot spawn utilities, so the embedding app exports
/// `UIDevice.identifierForVendor` and `systemVersion` through these
/// variables before the identity service starts.
pub const VENDOR_ID_ENV: &str = "IDENTIFIER_FOR_VENDOR";
pub const SYSTEM_VERSION_ENV: &str = "IOS_SYSTEM_VERSION";

#[derive(Debug, Default)]
pub struct IosCollector {}

fn machine(probe: &dyn SystemProbe) -> TierResult {
    let release = probe.os_release()?;
    non_empty("uname machine", &release.machine)
}

#[async_trait]
impl SignalCollector for IosCollector {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    fn tiers(&self) -> Vec<Tier> {
        vec![Tier::VendorIdentifier, Tier::ModelName]
    }

    async fn collect_raw_identifier(&self, tier: Tier, probe: &dyn SystemProbe) -> TierResult {
        match tier {
            Tier::VendorIdentifier => {
                let vendor_id = non_empty(VENDOR_ID_ENV, &probe.env_var(VENDOR_ID_ENV)?)?;
                // identifierForVendor is all zeros while the device is locked
                // right after a restart.
                reject_placeholder(VENDOR_ID_ENV, vendor_id)
            }
            Tier::ModelName => machine(probe),
            other => Err(unsupported(other, Platform::Ios)),
        }
    }

    async fn collect_os_version(&self, probe: &dyn SystemProbe) -> TierResult {
        non_empty(SYSTEM_VERSION_ENV, &probe.env_var(SYSTEM_VERSION_ENV)?)
    }

    async fn collect_model(&self, probe: &dyn SystemProbe) -> TierResult {
        machine(probe)
    }
}
