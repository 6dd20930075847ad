// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use anyhow::Result;
use async_trait::async_trait;
use collector::{BoxedCollector, GenericOs, HostProbe, SystemProbe};
use log::{info, warn};
use reqwest::header::HeaderMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

pub mod app_metadata;
pub mod config;
pub mod digest;
pub mod headers;
pub mod identity;
pub mod resolver;

pub use app_metadata::{AppMetadata, StaticAppMetadata};
pub use identity::{DeviceIdentity, IdentitySource};
pub use resolver::{IdentifierResolver, Resolution, TierAttempt, TierOutcome};

use crate::config::Config;

/// Device Identity Service resolves a stable, hashed hardware identifier
/// plus OS and model metadata for the running device, and projects them onto
/// outbound request headers. It provides the following APIs
/// - `get_device_identity`: resolve the identity once and return the cached
/// value afterwards. Concurrent first callers share a single resolution.
/// - `invalidate`: drop the cached identity so the next call probes the host
/// again.
/// - `headers`: the identity as `x-hwid`, `x-device-os`, `x-ver-os`,
/// `x-device-model` and `user-agent` headers.
///
/// None of them fail: unavailable host data degrades to generic values.
///
/// # Example
///
/// ```no_run
/// use identity_agent::{DeviceIdentityAPIs, DeviceIdentityService};
///
/// # async fn run() -> anyhow::Result<()> {
/// let service = DeviceIdentityService::new(None)?;
/// let identity = service.get_device_identity().await;
/// println!("{}", identity.hwid);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait DeviceIdentityAPIs {
    /// Get the cached device identity, resolving it on first use.
    async fn get_device_identity(&self) -> Arc<DeviceIdentity>;

    /// Forget the cached identity.
    fn invalidate(&self);

    /// Identity headers for outbound requests.
    async fn headers(&self) -> HeaderMap;

    fn cache_state(&self) -> CacheState;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Uncomputed,
    Computing,
    Cached,
}

/// One generation of the cache. `invalidate` swaps in a fresh slot; a
/// resolution still running on the old one completes there and is dropped.
#[derive(Default)]
struct Slot {
    cell: OnceCell<Arc<DeviceIdentity>>,
    in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct DeviceIdentityService {
    probe: Arc<dyn SystemProbe>,
    collector: BoxedCollector,
    app: Arc<dyn AppMetadata>,
    resolver: IdentifierResolver,
    slot: Mutex<Arc<Slot>>,
}

impl DeviceIdentityService {
    /// Create a new instance of [DeviceIdentityService] probing the real host.
    pub fn new(config_path: Option<&str>) -> Result<Self> {
        let config = match config_path {
            Some(config_path) => {
                info!("Using device identity config file: {config_path}");
                Config::try_from(config_path)?
            }
            None => Config::new(),
        };

        Ok(Self::from_config(&config))
    }

    pub fn from_config(config: &Config) -> Self {
        let platform = config.platform();
        info!("Device identity platform: {platform}");

        Self::with_parts(
            Arc::new(HostProbe::new(config.probe.command_timeout())),
            platform.into(),
            Arc::new(StaticAppMetadata::from(&config.app)),
        )
    }

    /// Assemble a service from explicit collaborators.
    pub fn with_parts(
        probe: Arc<dyn SystemProbe>,
        collector: BoxedCollector,
        app: Arc<dyn AppMetadata>,
    ) -> Self {
        Self {
            probe,
            collector,
            app,
            resolver: IdentifierResolver::new(),
            slot: Mutex::new(Arc::new(Slot::default())),
        }
    }

    /// Walk the tier chain without touching the cache. For diagnostics.
    pub async fn explain(&self) -> Resolution {
        self.resolver
            .resolve(self.collector.as_ref(), self.probe.as_ref())
            .await
    }

    fn current_slot(&self) -> Arc<Slot> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn compute(&self) -> DeviceIdentity {
        let probe = self.probe.as_ref();
        let collector = self.collector.as_ref();

        let resolution = self.resolver.resolve(collector, probe).await;
        let hwid = digest::hwid_digest(&resolution.composite);

        let generic = GenericOs::detect(probe);
        let os_version = match collector.collect_os_version(probe).await {
            Ok(version) => version,
            Err(e) => {
                warn!("OS version lookup failed, using generic value: {e}");
                generic.version.clone()
            }
        };
        let device_model = match collector.collect_model(probe).await {
            Ok(model) => model,
            Err(e) => {
                warn!("Device model lookup failed, using generic value: {e}");
                generic.machine.clone()
            }
        };
        let device_os = collector.platform().device_os(&generic.name);

        info!("Device identity resolved from {}: {hwid}", resolution.source);
        DeviceIdentity::new(
            hwid,
            &device_os,
            &os_version,
            &device_model,
            self.app.as_ref(),
            resolution.source,
        )
    }
}

#[async_trait]
impl DeviceIdentityAPIs for DeviceIdentityService {
    async fn get_device_identity(&self) -> Arc<DeviceIdentity> {
        let slot = self.current_slot();
        slot.cell
            .get_or_init(|| async {
                let _in_flight = InFlight::enter(&slot.in_flight);
                Arc::new(self.compute().await)
            })
            .await
            .clone()
    }

    fn invalidate(&self) {
        info!("Device identity invalidated");
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Arc::new(Slot::default());
    }

    async fn headers(&self) -> HeaderMap {
        headers::to_header_map(&*self.get_device_identity().await)
    }

    fn cache_state(&self) -> CacheState {
        let slot = self.current_slot();
        if slot.cell.initialized() {
            CacheState::Cached
        } else if slot.in_flight.load(Ordering::SeqCst) {
            CacheState::Computing
        } else {
            CacheState::Uncomputed
        }
    }
}
