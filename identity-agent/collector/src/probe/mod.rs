// Copyright (c) 2026 Alibaba Cloud
//
// SPDX-License-Identifier: Apache-2.0
//

//! Narrow access to the host: external utilities, well-known files,
//! environment variables and uname.

use async_trait::async_trait;
use log::debug;
use std::io;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{program}` exited with {status}")]
    Exit { program: String, status: String },

    #[error("`{program}` did not finish within {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("environment variable {0} is not set")]
    Env(String),

    #[error("{0} is empty")]
    Empty(String),

    #[error("{0} not found in output")]
    Parse(String),

    #[error("{0} holds a placeholder value")]
    Placeholder(String),

    #[error("{0}")]
    Unsupported(String),
}

/// uname(2) style description of the running kernel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    pub sysname: String,
    pub nodename: String,
    pub release: String,
    pub version: String,
    pub machine: String,
}

/// Host access used by the collectors. Implementations must be cheap to
/// share between tasks and must report every failure as a [`ProbeError`].
#[async_trait]
pub trait SystemProbe: Send + Sync {
    /// Run `program` with `args` and return its stdout.
    async fn run_command(&self, program: &str, args: &[&str]) -> Result<String, ProbeError>;

    async fn read_file(&self, path: &str) -> Result<String, ProbeError>;

    fn env_var(&self, key: &str) -> Result<String, ProbeError>;

    fn os_release(&self) -> Result<OsRelease, ProbeError>;
}

/// The real host. External processes are bounded by `command_timeout` and
/// killed when it expires.
#[derive(Debug, Clone)]
pub struct HostProbe {
    command_timeout: Duration,
}

impl Default for HostProbe {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

impl HostProbe {
    pub fn new(command_timeout: Duration) -> Self {
        Self { command_timeout }
    }

    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }
}

#[async_trait]
impl SystemProbe for HostProbe {
    async fn run_command(&self, program: &str, args: &[&str]) -> Result<String, ProbeError> {
        debug!("Running `{program}` with {args:?}");
        let mut command = Command::new(program);
        command.args(args).kill_on_drop(true);

        let output = match timeout(self.command_timeout, command.output()).await {
            Ok(output) => output.map_err(|source| ProbeError::Spawn {
                program: program.to_string(),
                source,
            })?,
            Err(_) => {
                return Err(ProbeError::Timeout {
                    program: program.to_string(),
                    timeout: self.command_timeout,
                })
            }
        };

        if !output.status.success() {
            return Err(ProbeError::Exit {
                program: program.to_string(),
                status: output.status.to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn read_file(&self, path: &str) -> Result<String, ProbeError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ProbeError::Io {
                path: path.to_string(),
                source,
            })
    }

    fn env_var(&self, key: &str) -> Result<String, ProbeError> {
        std::env::var(key).map_err(|_| ProbeError::Env(key.to_string()))
    }

    #[cfg(unix)]
    fn os_release(&self) -> Result<OsRelease, ProbeError> {
        let uname = nix::sys::utsname::uname()
            .map_err(|e| ProbeError::Unsupported(format!("uname failed: {e}")))?;

        Ok(OsRelease {
            sysname: uname.sysname().to_string_lossy().into_owned(),
            nodename: uname.nodename().to_string_lossy().into_owned(),
            release: uname.release().to_string_lossy().into_owned(),
            version: uname.version().to_string_lossy().into_owned(),
            machine: uname.machine().to_string_lossy().into_owned(),
        })
    }

    #[cfg(not(unix))]
    fn os_release(&self) -> Result<OsRelease, ProbeError> {
        Err(ProbeError::Unsupported(
            "uname is not available on this platform".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let probe = HostProbe::default();
        let res = probe
            .run_command("definitely-not-a-real-binary-4242", &[])
            .await;
        assert!(matches!(res, Err(ProbeError::Spawn { .. })));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let probe = HostProbe::default();
        let res = probe.read_file("/nonexistent/device-identity/file").await;
        assert!(matches!(res, Err(ProbeError::Io { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit() {
        let probe = HostProbe::default();
        let res = probe.run_command("sh", &["-c", "exit 3"]).await;
        assert!(matches!(res, Err(ProbeError::Exit { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_stdout() {
        let probe = HostProbe::default();
        let out = probe.run_command("sh", &["-c", "echo hello"]).await.unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hung_command_times_out() {
        let probe = HostProbe::new(Duration::from_millis(200));
        let err = probe.run_command("sleep", &["10"]).await.unwrap_err();
        assert!(matches!(
            err,
            ProbeError::Timeout { timeout, .. } if timeout == Duration::from_millis(200)
        ));
        assert_eq!(err.to_string(), "`sleep` did not finish within 200ms");
    }

    #[test]
    fn test_env_var_missing() {
        let probe = HostProbe::default();
        let res = probe.env_var("DEVICE_IDENTITY_SURELY_UNSET_VARIABLE");
        assert!(matches!(res, Err(ProbeError::Env(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_os_release() {
        let release = HostProbe::default().os_release().unwrap();
        assert!(!release.sysname.is_empty());
        assert!(!release.machine.is_empty());
    }
}
