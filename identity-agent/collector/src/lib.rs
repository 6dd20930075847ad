// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

//! Platform signal collection for device identity resolution.
//!
//! Every supported platform exposes an ordered list of [`Tier`]s. A tier is
//! one attempt at reading raw identifier material from the host, through the
//! injectable [`SystemProbe`]. Collectors never panic and never give up the
//! whole chain on a single failure: each call returns a [`TierResult`] and it
//! is up to the caller to walk the tiers in order.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

pub mod android;
pub mod ios;
pub mod linux;
pub mod macos;
pub mod other;
pub mod probe;
pub mod utils;
pub mod windows;

pub use probe::{HostProbe, OsRelease, ProbeError, SystemProbe, DEFAULT_COMMAND_TIMEOUT};

/// Outcome of a single collection attempt. `Ok` always holds a trimmed,
/// non-empty value.
pub type TierResult = std::result::Result<String, ProbeError>;

/// Delimiter used when a tier concatenates several raw fields.
pub const FIELD_DELIMITER: &str = "|";

/// Placeholder used when a metadata value cannot be determined at all.
pub const UNKNOWN: &str = "unknown";

#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Platform {
    Android,
    Ios,
    Windows,
    MacOs,
    Linux,
    Other,
}

impl Platform {
    #[allow(unreachable_code)]
    pub fn current() -> Self {
        #[cfg(target_os = "android")]
        return Self::Android;

        #[cfg(target_os = "ios")]
        return Self::Ios;

        #[cfg(target_os = "windows")]
        return Self::Windows;

        #[cfg(target_os = "macos")]
        return Self::MacOs;

        #[cfg(target_os = "linux")]
        return Self::Linux;

        Self::Other
    }

    /// Canonical OS family name reported to the backend. Unrecognized
    /// platforms report the raw OS name given by the host.
    pub fn device_os(&self, raw_os_name: &str) -> String {
        match self {
            Platform::Android => "Android".into(),
            Platform::Ios => "iOS".into(),
            Platform::Windows => "Windows".into(),
            Platform::MacOs => "macOS".into(),
            Platform::Linux => "Linux".into(),
            Platform::Other => {
                let raw = raw_os_name.trim();
                if raw.is_empty() {
                    "Other".into()
                } else {
                    raw.to_string()
                }
            }
        }
    }
}

/// Every identifier tier known to the collectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tier {
    /// Android secure id plus build properties.
    AndroidBuild,
    /// iOS identifierForVendor handed over by the embedding app.
    VendorIdentifier,
    ModelName,
    /// `HKLM\SOFTWARE\Microsoft\Cryptography\MachineGuid`
    MachineGuid,
    /// SMBIOS product UUID as reported by `wmic csproduct`.
    ProductUuid,
    ComputerName,
    HardwareUuid,
    PlatformUuid,
    HostName,
    MachineId,
    DbusMachineId,
    DmiProductUuid,
    OsNameVersion,
}

/// Common capability implemented by each platform variant.
#[async_trait]
pub trait SignalCollector: Send + Sync {
    fn platform(&self) -> Platform;

    /// Tiers in strict priority order.
    fn tiers(&self) -> Vec<Tier>;

    /// Run a single tier. Tiers that do not belong to this platform fail
    /// with [`ProbeError::Unsupported`].
    async fn collect_raw_identifier(&self, tier: Tier, probe: &dyn SystemProbe) -> TierResult;

    async fn collect_os_version(&self, probe: &dyn SystemProbe) -> TierResult;

    async fn collect_model(&self, probe: &dyn SystemProbe) -> TierResult;
}

pub type BoxedCollector = Box<dyn SignalCollector>;

impl From<Platform> for BoxedCollector {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::Android => Box::<android::AndroidCollector>::default(),
            Platform::Ios => Box::<ios::IosCollector>::default(),
            Platform::Windows => Box::<windows::WindowsCollector>::default(),
            Platform::MacOs => Box::<macos::MacOsCollector>::default(),
            Platform::Linux => Box::<linux::LinuxCollector>::default(),
            Platform::Other => Box::<other::OtherCollector>::default(),
        }
    }
}

/// Build the collector for the platform this binary runs on.
pub fn detect_collector() -> BoxedCollector {
    Platform::current().into()
}

/// Generic OS values used whenever a platform specific lookup fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericOs {
    pub name: String,
    pub version: String,
    pub machine: String,
}

impl GenericOs {
    pub fn detect(probe: &dyn SystemProbe) -> Self {
        match probe.os_release() {
            Ok(release) => Self {
                name: utils::or_placeholder(&release.sysname, std::env::consts::OS),
                version: utils::or_placeholder(&release.release, UNKNOWN),
                machine: utils::or_placeholder(&release.machine, std::env::consts::ARCH),
            },
            Err(e) => {
                log::debug!("uname unavailable, using compile time OS values: {e}");
                Self {
                    name: std::env::consts::OS.to_string(),
                    version: UNKNOWN.to_string(),
                    machine: std::env::consts::ARCH.to_string(),
                }
            }
        }
    }
}

pub(crate) fn unsupported(tier: Tier, platform: Platform) -> ProbeError {
    ProbeError::Unsupported(format!("tier {tier} is not collected on {platform}"))
}
