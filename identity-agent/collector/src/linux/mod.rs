// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use async_trait::async_trait;

use crate::utils::{non_empty, os_name_version, os_release_field, read_identity_file};
use crate::{unsupported, Platform, SignalCollector, SystemProbe, Tier, TierResult};

pub const MACHINE_ID_PATH: &str = "/etc/machine-id";
pub const DBUS_MACHINE_ID_PATH: &str = "/var/lib/dbus/machine-id";
pub const DMI_PRODUCT_UUID_PATH: &str = "/sys/class/dmi/id/product_uuid";
pub const DMI_PRODUCT_NAME_PATH: &str = "/sys/class/dmi/id/product_name";
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

#[derive(Debug, Default)]
pub struct LinuxCollector {}

#[async_trait]
impl SignalCollector for LinuxCollector {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn tiers(&self) -> Vec<Tier> {
        vec![
            Tier::MachineId,
            Tier::DbusMachineId,
            Tier::DmiProductUuid,
            Tier::OsNameVersion,
        ]
    }

    async fn collect_raw_identifier(&self, tier: Tier, probe: &dyn SystemProbe) -> TierResult {
        match tier {
            Tier::MachineId => read_identity_file(probe, MACHINE_ID_PATH).await,
            Tier::DbusMachineId => read_identity_file(probe, DBUS_MACHINE_ID_PATH).await,
            // product_uuid is root-only on most distributions.
            Tier::DmiProductUuid => read_identity_file(probe, DMI_PRODUCT_UUID_PATH).await,
            Tier::OsNameVersion => os_name_version(probe),
            other => Err(unsupported(other, Platform::Linux)),
        }
    }

    async fn collect_os_version(&self, probe: &dyn SystemProbe) -> TierResult {
        if let Ok(content) = probe.read_file(OS_RELEASE_PATH).await {
            if let Ok(version) = os_release_field(&content, "VERSION_ID") {
                return Ok(version);
            }
        }

        let release = probe.os_release()?;
        non_empty("uname release", &release.release)
    }

    async fn collect_model(&self, probe: &dyn SystemProbe) -> TierResult {
        let product_name = probe.read_file(DMI_PRODUCT_NAME_PATH).await?;
        non_empty(DMI_PRODUCT_NAME_PATH, &product_name)
    }
}
