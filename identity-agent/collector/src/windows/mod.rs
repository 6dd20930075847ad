// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use async_trait::async_trait;

use crate::utils::{
    hostname, join_non_empty, non_empty, reg_value, reject_placeholder, windows_version,
    wmic_value,
};
use crate::{unsupported, Platform, SignalCollector, SystemProbe, Tier, TierResult};

const CRYPTOGRAPHY_KEY: &str = r"HKLM\SOFTWARE\Microsoft\Cryptography";

#[derive(Debug, Default)]
pub struct WindowsCollector {}

async fn machine_guid(probe: &dyn SystemProbe) -> TierResult {
    let output = probe
        .run_command("reg", &["query", CRYPTOGRAPHY_KEY, "/v", "MachineGuid"])
        .await?;
    reject_placeholder("MachineGuid", reg_value(&output, "MachineGuid")?)
}

async fn product_uuid(probe: &dyn SystemProbe) -> TierResult {
    let output = probe.run_command("wmic", &["csproduct", "get", "UUID"]).await?;
    reject_placeholder("csproduct UUID", wmic_value(&output, "UUID")?)
}

async fn os_build(probe: &dyn SystemProbe) -> TierResult {
    let output = probe.run_command("cmd", &["/c", "ver"]).await?;
    windows_version(&output)
}

async fn computer_name(probe: &dyn SystemProbe) -> TierResult {
    let name = match probe.env_var("COMPUTERNAME") {
        Ok(name) if !name.trim().is_empty() => name,
        _ => hostname(probe).await?,
    };
    // A build lookup failure still leaves the computer name usable.
    let build = os_build(probe).await.unwrap_or_default();
    non_empty("computer name", &join_non_empty([name.as_str(), build.as_str()]))
}

#[async_trait]
impl SignalCollector for WindowsCollector {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn tiers(&self) -> Vec<Tier> {
        vec![Tier::MachineGuid, Tier::ProductUuid, Tier::ComputerName]
    }

    async fn collect_raw_identifier(&self, tier: Tier, probe: &dyn SystemProbe) -> TierResult {
        match tier {
            Tier::MachineGuid => machine_guid(probe).await,
            Tier::ProductUuid => product_uuid(probe).await,
            Tier::ComputerName => computer_name(probe).await,
            other => Err(unsupported(other, Platform::Windows)),
        }
    }

    async fn collect_os_version(&self, probe: &dyn SystemProbe) -> TierResult {
        os_build(probe).await
    }

    async fn collect_model(&self, probe: &dyn SystemProbe) -> TierResult {
        let output = probe
            .run_command("wmic", &["computersystem", "get", "model"])
            .await?;
        wmic_value(&output, "Model")
    }
}
