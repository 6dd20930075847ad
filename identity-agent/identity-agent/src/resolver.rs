// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use collector::utils::{hostname, join_non_empty};
use collector::{GenericOs, SignalCollector, SystemProbe, Tier};
use log::{debug, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::identity::IdentitySource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "reason")]
pub enum TierOutcome {
    Accepted,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierAttempt {
    pub tier: Tier,
    pub outcome: TierOutcome,
}

/// Result of walking a platform's tier chain.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Raw identifier material. Never logged, never sent anywhere undigested.
    pub composite: String,
    pub source: IdentitySource,
    pub attempts: Vec<TierAttempt>,
}

/// Walks the tiers of a collector in priority order and keeps the first
/// non-empty value.
#[derive(Debug)]
pub struct IdentifierResolver {
    session_nonce: String,
}

impl Default for IdentifierResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentifierResolver {
    pub fn new() -> Self {
        Self {
            session_nonce: Uuid::new_v4().simple().to_string(),
        }
    }

    pub async fn resolve(
        &self,
        collector: &dyn SignalCollector,
        probe: &dyn SystemProbe,
    ) -> Resolution {
        let mut attempts = Vec::new();

        for tier in collector.tiers() {
            match collector.collect_raw_identifier(tier, probe).await {
                Ok(composite) if !composite.trim().is_empty() => {
                    attempts.push(TierAttempt {
                        tier,
                        outcome: TierOutcome::Accepted,
                    });
                    return Resolution {
                        composite,
                        source: IdentitySource::Tier { tier },
                        attempts,
                    };
                }
                Ok(_) => {
                    debug!("Identity tier {tier} returned an empty value");
                    attempts.push(TierAttempt {
                        tier,
                        outcome: TierOutcome::Failed("empty value".into()),
                    });
                }
                Err(e) => {
                    debug!("Identity tier {tier} failed: {e}");
                    attempts.push(TierAttempt {
                        tier,
                        outcome: TierOutcome::Failed(e.to_string()),
                    });
                }
            }
        }

        warn!(
            "All {} identity tiers failed on {}, using the last resort identifier",
            attempts.len(),
            collector.platform()
        );
        self.last_resort(collector, probe, attempts).await
    }

    /// `<os>|<version>|<hostname>` when the host name can be queried,
    /// otherwise `<os>|<version>|<nonce>` with a nonce drawn once per
    /// resolver.
    async fn last_resort(
        &self,
        collector: &dyn SignalCollector,
        probe: &dyn SystemProbe,
        attempts: Vec<TierAttempt>,
    ) -> Resolution {
        let generic = GenericOs::detect(probe);
        let os = collector.platform().device_os(&generic.name);

        let (salt, deterministic) = match hostname(probe).await {
            Ok(host) => (host, true),
            Err(e) => {
                warn!("Host name unavailable ({e}), identifier will not survive a restart");
                (self.session_nonce.clone(), false)
            }
        };

        Resolution {
            composite: join_non_empty([os.as_str(), generic.version.as_str(), salt.as_str()]),
            source: IdentitySource::LastResort { deterministic },
            attempts,
        }
    }
}
