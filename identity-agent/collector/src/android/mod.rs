// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use async_trait::async_trait;
use log::debug;

use crate::utils::{command_output, join_non_empty, non_empty};
use crate::{unsupported, Platform, SignalCollector, SystemProbe, Tier, TierResult};

const FINGERPRINT_PROP: &str = "ro.build.fingerprint";
const MANUFACTURER_PROP: &str = "ro.product.manufacturer";
const BRAND_PROP: &str = "ro.product.brand";
const MODEL_PROP: &str = "ro.product.model";
const RELEASE_PROP: &str = "ro.build.version.release";

#[derive(Debug, Default)]
pub struct AndroidCollector {}

async fn getprop(probe: &dyn SystemProbe, property: &str) -> TierResult {
    command_output(probe, "getprop", &[property]).await
}

async fn android_id(probe: &dyn SystemProbe) -> TierResult {
    let id = command_output(probe, "settings", &["get", "secure", "android_id"]).await?;
    // `settings` prints the literal "null" when the key is unset.
    if id == "null" {
        return Err(crate::ProbeError::Empty("android_id".into()));
    }
    Ok(id)
}

#[async_trait]
impl SignalCollector for AndroidCollector {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    fn tiers(&self) -> Vec<Tier> {
        vec![Tier::AndroidBuild]
    }

    async fn collect_raw_identifier(&self, tier: Tier, probe: &dyn SystemProbe) -> TierResult {
        if tier != Tier::AndroidBuild {
            return Err(unsupported(tier, Platform::Android));
        }

        let mut fields = Vec::with_capacity(5);
        match android_id(probe).await {
            Ok(id) => fields.push(id),
            Err(e) => debug!("android_id unavailable: {e}"),
        }
        for property in [FINGERPRINT_PROP, MANUFACTURER_PROP, BRAND_PROP, MODEL_PROP] {
            match getprop(probe, property).await {
                Ok(value) => fields.push(value),
                Err(e) => debug!("{property} unavailable: {e}"),
            }
        }

        let composite = join_non_empty(fields.iter().map(String::as_str));
        non_empty("android build properties", &composite)
    }

    async fn collect_os_version(&self, probe: &dyn SystemProbe) -> TierResult {
        getprop(probe, RELEASE_PROP).await
    }

    async fn collect_model(&self, probe: &dyn SystemProbe) -> TierResult {
        let manufacturer = getprop(probe, MANUFACTURER_PROP).await.unwrap_or_default();
        let model = getprop(probe, MODEL_PROP).await?;
        non_empty("android model", &format!("{manufacturer} {model}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::mock::MockedProbe;

    fn device() -> MockedProbe {
        MockedProbe::new()
            .with_command("settings get secure android_id", "9774d56d682e549c\n")
            .with_command(
                "getprop ro.build.fingerprint",
                "google/husky/husky:14/UQ1A.240105.004/11206848:user/release-keys\n",
            )
            .with_command("getprop ro.product.manufacturer", "Google\n")
            .with_command("getprop ro.product.brand", "google\n")
            .with_command("getprop ro.product.model", "Pixel 8 Pro\n")
            .with_command("getprop ro.build.version.release", "14\n")
    }

    #[tokio::test]
    async fn test_android_build_composite() {
        let id = AndroidCollector::default()
            .collect_raw_identifier(Tier::AndroidBuild, &device())
            .await
            .unwrap();
        assert_eq!(
            id,
            "9774d56d682e549c|google/husky/husky:14/UQ1A.240105.004/11206848:user/release-keys|Google|google|Pixel 8 Pro"
        );
    }

    #[tokio::test]
    async fn test_android_build_skips_missing_fields() {
        let probe = MockedProbe::new()
            .with_command("settings get secure android_id", "null\n")
            .with_command("getprop ro.product.brand", "samsung\n")
            .with_command("getprop ro.product.model", "SM-S918B\n");
        let id = AndroidCollector::default()
            .collect_raw_identifier(Tier::AndroidBuild, &probe)
            .await
            .unwrap();
        assert_eq!(id, "samsung|SM-S918B");
    }

    #[tokio::test]
    async fn test_android_build_fails_when_nothing_is_readable() {
        let res = AndroidCollector::default()
            .collect_raw_identifier(Tier::AndroidBuild, &MockedProbe::new())
            .await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn test_android_metadata() {
        let collector = AndroidCollector::default();
        let probe = device();
        assert_eq!(collector.collect_os_version(&probe).await.unwrap(), "14");
        assert_eq!(
            collector.collect_model(&probe).await.unwrap(),
            "Google Pixel 8 Pro"
        );
    }
}
