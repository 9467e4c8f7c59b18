//! Local etcd member launcher for self-hosted mode.
//!
//! # Responsibilities
//! - Spawn the `etcd` binary serving clients on the configured endpoint
//! - Poll its health endpoint with backoff until it is ready
//! - Keep the child handle so the member outlives `start`
//! - Kill and reap the child on every failure path
//!
//! `start` runs before the log sink is installed, so its tracing events are
//! usually dropped. Anything the operator needs to diagnose a failed launch
//! (exit status, attempts, last health error) is carried in the returned
//! [`EtcdError`].

use std::process::Stdio;

use tokio::process::{Child, Command};
use url::Url;

use crate::config::EtcdLaunchConfig;
use crate::etcd::{CoordStoreBootstrapper, EtcdError, EtcdHealthChecker};
use crate::resilience::Backoff;

/// Launches a single-member etcd cluster as a child process.
#[derive(Debug)]
pub struct LocalEtcd {
    config: EtcdLaunchConfig,
    child: Option<Child>,
}

impl LocalEtcd {
    pub fn new(config: EtcdLaunchConfig) -> Self {
        Self {
            config,
            child: None,
        }
    }

    /// PID of the running member, if one was started.
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }

    fn command(&self, endpoint: &str) -> Command {
        let cfg = &self.config;
        let mut cmd = Command::new(&cfg.binary);
        cmd.arg("--name")
            .arg(&cfg.name)
            .arg("--data-dir")
            .arg(&cfg.data_dir)
            .arg("--listen-client-urls")
            .arg(endpoint)
            .arg("--advertise-client-urls")
            .arg(endpoint)
            .arg("--listen-peer-urls")
            .arg(&cfg.peer_url)
            .arg("--initial-advertise-peer-urls")
            .arg(&cfg.peer_url)
            .arg("--initial-cluster")
            .arg(format!("{}={}", cfg.name, cfg.peer_url))
            .stdin(Stdio::null())
            .kill_on_drop(false);
        cmd
    }
}

impl CoordStoreBootstrapper for LocalEtcd {
    async fn start(&mut self, endpoint: &str) -> Result<(), EtcdError> {
        let url = Url::parse(endpoint)?;
        let checker = EtcdHealthChecker::new(&url, None)?;
        let backoff = Backoff::new(self.config.base_delay_ms, self.config.max_delay_ms);
        let attempts = self.config.ready_attempts;

        tokio::fs::create_dir_all(&self.config.data_dir).await?;

        let mut child = self
            .command(endpoint)
            .spawn()
            .map_err(|source| EtcdError::Spawn {
                binary: self.config.binary.clone(),
                source,
            })?;

        tracing::info!(
            pid = child.id(),
            endpoint = %url,
            data_dir = %self.config.data_dir.display(),
            "Started local etcd member"
        );

        let mut last = String::from("no health check attempted");
        for attempt in 1..=attempts {
            match child.try_wait() {
                Ok(Some(status)) => {
                    tracing::error!(%status, "Local etcd member exited during startup");
                    return Err(EtcdError::Exited(status));
                }
                Ok(None) => {}
                Err(e) => {
                    reap(&mut child).await;
                    return Err(EtcdError::Io(e));
                }
            }

            match checker.check().await {
                Ok(()) => {
                    tracing::info!(endpoint = %url, attempt, "Local etcd member is healthy");
                    self.child = Some(child);
                    return Ok(());
                }
                Err(e) => {
                    tracing::debug!(attempt, error = %e, "Waiting for local etcd member");
                    last = e.to_string();
                }
            }

            if attempt < attempts {
                tokio::time::sleep(backoff.delay(attempt)).await;
            }
        }

        reap(&mut child).await;
        Err(EtcdError::NotReady { attempts, last })
    }
}

/// Kill a member that never became healthy and wait for it to exit.
async fn reap(child: &mut Child) {
    if let Err(e) = child.kill().await {
        tracing::warn!(pid = child.id(), error = %e, "Failed to kill unhealthy etcd member");
    }
}
