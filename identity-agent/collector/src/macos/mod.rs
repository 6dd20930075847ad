// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use async_trait::async_trait;

use crate::utils::{command_output, hostname, join_non_empty, non_empty, reject_placeholder, value_after};
use crate::{unsupported, Platform, SignalCollector, SystemProbe, Tier, TierResult};

#[derive(Debug, Default)]
pub struct MacOsCollector {}

async fn hardware_uuid(probe: &dyn SystemProbe) -> TierResult {
    let output = probe
        .run_command("system_profiler", &["SPHardwareDataType"])
        .await?;
    reject_placeholder("Hardware UUID", value_after(&output, "Hardware UUID", ':')?)
}

async fn platform_uuid(probe: &dyn SystemProbe) -> TierResult {
    let output = probe
        .run_command("ioreg", &["-rd1", "-c", "IOPlatformExpertDevice"])
        .await?;
    reject_placeholder(
        "IOPlatformUUID",
        value_after(&output, "IOPlatformUUID", '=')?,
    )
}

async fn product_version(probe: &dyn SystemProbe) -> TierResult {
    command_output(probe, "sw_vers", &["-productVersion"]).await
}

#[async_trait]
impl SignalCollector for MacOsCollector {
    fn platform(&self) -> Platform {
        Platform::MacOs
    }

    fn tiers(&self) -> Vec<Tier> {
        vec![Tier::HardwareUuid, Tier::PlatformUuid, Tier::HostName]
    }

    async fn collect_raw_identifier(&self, tier: Tier, probe: &dyn SystemProbe) -> TierResult {
        match tier {
            Tier::HardwareUuid => hardware_uuid(probe).await,
            Tier::PlatformUuid => platform_uuid(probe).await,
            Tier::HostName => {
                let host = hostname(probe).await?;
                let version = product_version(probe).await.unwrap_or_default();
                non_empty("host name", &join_non_empty([host.as_str(), version.as_str()]))
            }
            other => Err(unsupported(other, Platform::MacOs)),
        }
    }

    async fn collect_os_version(&self, probe: &dyn SystemProbe) -> TierResult {
        product_version(probe).await
    }

    async fn collect_model(&self, probe: &dyn SystemProbe) -> TierResult {
        command_output(probe, "sysctl", &["-n", "hw.model"]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::mock::MockedProbe;

    const PROFILER: &str = "Hardware:\n\n    Hardware Overview:\n\n      Model Name: MacBook Pro\n      Model Identifier: Mac15,3\n      Hardware UUID: 1A2B3C4D-0000-1111-2222-333344445555\n";
    const IOREG: &str = "+-o J314sAP  <class IOPlatformExpertDevice>\n    {\n      \"IOPlatformUUID\" = \"5E6F7A8B-0000-1111-2222-333344445555\"\n    }\n";

    #[tokio::test]
    async fn test_tier_order() {
        assert_eq!(
            MacOsCollector::default().tiers(),
            vec![Tier::HardwareUuid, Tier::PlatformUuid, Tier::HostName]
        );
    }

    #[tokio::test]
    async fn test_hardware_uuid() {
        let probe = MockedProbe::new().with_command("system_profiler SPHardwareDataType", PROFILER);
        let id = MacOsCollector::default()
            .collect_raw_identifier(Tier::HardwareUuid, &probe)
            .await
            .unwrap();
        assert_eq!(id, "1A2B3C4D-0000-1111-2222-333344445555");
    }

    #[tokio::test]
    async fn test_platform_uuid() {
        let probe = MockedProbe::new().with_command("ioreg -rd1 -c IOPlatformExpertDevice", IOREG);
        let id = MacOsCollector::default()
            .collect_raw_identifier(Tier::PlatformUuid, &probe)
            .await
            .unwrap();
        assert_eq!(id, "5E6F7A8B-0000-1111-2222-333344445555");
    }

    #[tokio::test]
    async fn test_host_name_tier() {
        let probe = MockedProbe::new()
            .with_command("hostname", "studio.local\n")
            .with_command("sw_vers -productVersion", "14.4.1\n")
            .with_command("sysctl -n hw.model", "Mac14,13\n");
        let collector = MacOsCollector::default();
        assert_eq!(
            collector
                .collect_raw_identifier(Tier::HostName, &probe)
                .await
                .unwrap(),
            "studio.local|14.4.1"
        );
        assert_eq!(collector.collect_os_version(&probe).await.unwrap(), "14.4.1");
        assert_eq!(collector.collect_model(&probe).await.unwrap(), "Mac14,13");
    }
}
