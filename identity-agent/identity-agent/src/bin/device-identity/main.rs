// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

//! One-shot client of the device identity service.

use anyhow::*;
use clap::{Parser, Subcommand};
use identity_agent::resolver::TierOutcome;
use identity_agent::{DeviceIdentityAPIs, DeviceIdentityService};

#[derive(Parser)]
#[command(name = "device-identity")]
#[command(bin_name = "device-identity")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    operation: Operation,

    /// Configuration file for the identity service
    ///
    /// Example:
    /// `--config /etc/device-identity.conf`
    #[arg(short, long)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Operation {
    /// Print the resolved device identity as JSON
    GetIdentity,

    /// Print the identity headers attached to outbound requests
    GetHeaders,

    /// Show which identifier tiers were tried and which one was used
    Explain,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let cli = Cli::parse();

    let service =
        DeviceIdentityService::new(cli.config.as_deref()).context("start identity service")?;

    match cli.operation {
        Operation::GetIdentity => {
            let identity = service.get_device_identity().await;
            let json = serde_json::to_string_pretty(identity.as_ref())
                .context("serialize device identity")?;
            println!("{json}");
        }
        Operation::GetHeaders => {
            for (name, value) in &service.headers().await {
                println!("{name}: {}", String::from_utf8_lossy(value.as_bytes()));
            }
        }
        Operation::Explain => {
            let resolution = service.explain().await;
            for attempt in &resolution.attempts {
                match &attempt.outcome {
                    TierOutcome::Accepted => println!("{:<20} accepted", attempt.tier.as_ref()),
                    TierOutcome::Failed(reason) => {
                        println!("{:<20} failed: {reason}", attempt.tier.as_ref())
                    }
                }
            }
            println!("source: {}", resolution.source);
        }
    }

    Ok(())
}
