// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{OsRelease, ProbeError, SystemProbe};

/// In-memory host. Anything not registered behaves as missing: unknown
/// programs fail to spawn, unknown files are `NotFound`.
#[derive(Debug, Default)]
pub struct MockedProbe {
    commands: HashMap<String, String>,
    files: HashMap<String, String>,
    env: HashMap<String, String>,
    os_release: Option<OsRelease>,
    latency: Option<Duration>,
    calls: AtomicUsize,
}

impl MockedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register stdout for an exact command line, e.g. `"getprop ro.product.model"`.
    pub fn with_command(mut self, command_line: &str, stdout: &str) -> Self {
        self.commands
            .insert(command_line.to_string(), stdout.to_string());
        self
    }

    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.files.insert(path.to_string(), content.to_string());
        self
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_os_release(mut self, release: OsRelease) -> Self {
        self.os_release = Some(release);
        self
    }

    /// Delay every async call, to widen race windows in concurrency tests.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Total number of probe calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl SystemProbe for MockedProbe {
    async fn run_command(&self, program: &str, args: &[&str]) -> Result<String, ProbeError> {
        self.hit().await;
        let command_line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.commands
            .get(&command_line)
            .cloned()
            .ok_or_else(|| ProbeError::Spawn {
                program: program.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "not registered in mock"),
            })
    }

    async fn read_file(&self, path: &str) -> Result<String, ProbeError> {
        self.hit().await;
        self.files.get(path).cloned().ok_or_else(|| ProbeError::Io {
            path: path.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "not registered in mock"),
        })
    }

    fn env_var(&self, key: &str) -> Result<String, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.env
            .get(key)
            .cloned()
            .ok_or_else(|| ProbeError::Env(key.to_string()))
    }

    fn os_release(&self) -> Result<OsRelease, ProbeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.os_release
            .clone()
            .ok_or_else(|| ProbeError::Unsupported("uname not registered in mock".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mocked_probe() {
        let probe = MockedProbe::new()
            .with_command("hostname", "box\n")
            .with_file("/etc/machine-id", "abc\n");

        assert_eq!(probe.run_command("hostname", &[]).await.unwrap(), "box\n");
        assert_eq!(probe.read_file("/etc/machine-id").await.unwrap(), "abc\n");
        assert!(probe.run_command("hostname", &["-f"]).await.is_err());
        assert!(probe.env_var("HOME").is_err());
        assert!(probe.os_release().is_err());
        assert_eq!(probe.calls(), 5);
    }
}
