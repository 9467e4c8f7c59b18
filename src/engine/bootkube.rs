//! Default bootstrap engine.
//!
//! # Responsibilities
//! - Reject configurations whose network ranges collide
//! - Check the rendered assets before anything touches the host
//! - Wait for etcd, then hand the temporary control plane to the kubelet by
//!   staging the bootstrap manifests as static pods

use std::path::PathBuf;

use crate::config::StartupConfig;
use crate::engine::{AssetLayout, BootstrapEngine, EngineError, EngineFactory};
use crate::etcd::EtcdHealthChecker;
use crate::resilience::Backoff;

/// Builds [`Bootkube`] engines.
#[derive(Debug, Clone)]
pub struct BootkubeFactory {
    etcd_ready_attempts: u32,
    backoff: Backoff,
}

impl BootkubeFactory {
    pub fn new(etcd_ready_attempts: u32, backoff: Backoff) -> Self {
        Self {
            etcd_ready_attempts,
            backoff,
        }
    }
}

impl Default for BootkubeFactory {
    fn default() -> Self {
        Self::new(60, Backoff::new(500, 5000))
    }
}

impl EngineFactory for BootkubeFactory {
    type Engine = Bootkube;

    fn build(&self, config: StartupConfig) -> Result<Bootkube, EngineError> {
        let service = *config.service_cluster_ip_range();
        let cluster = *config.cluster_cidr();
        if service.overlaps(&cluster) {
            return Err(EngineError::CidrOverlap { service, cluster });
        }

        let assets = AssetLayout::load(config.asset_dir(), config.etcd_auth_enabled())?;
        let bootstrap_manifests = assets.bootstrap_manifest_files()?;

        tracing::debug!(
            asset_dir = %assets.root().display(),
            manifests = bootstrap_manifests.len(),
            "Asset directory checked"
        );

        Ok(Bootkube {
            config,
            assets,
            bootstrap_manifests,
            etcd_ready_attempts: self.etcd_ready_attempts,
            backoff: self.backoff,
        })
    }
}

/// Engine bound to one validated configuration.
#[derive(Debug)]
pub struct Bootkube {
    config: StartupConfig,
    assets: AssetLayout,
    bootstrap_manifests: Vec<PathBuf>,
    etcd_ready_attempts: u32,
    backoff: Backoff,
}

impl Bootkube {
    async fn stage_bootstrap_manifests(&self) -> Result<usize, EngineError> {
        let dest = self.config.pod_manifest_path();
        tokio::fs::create_dir_all(dest)
            .await
            .map_err(|source| EngineError::Io {
                path: dest.to_path_buf(),
                source,
            })?;

        let mut staged = 0;
        for src in &self.bootstrap_manifests {
            let Some(name) = src.file_name() else {
                continue;
            };
            let target = dest.join(name);
            tokio::fs::copy(src, &target)
                .await
                .map_err(|source| EngineError::Io {
                    path: target.clone(),
                    source,
                })?;
            tracing::debug!(manifest = %target.display(), "Staged bootstrap manifest");
            staged += 1;
        }
        Ok(staged)
    }
}

impl BootstrapEngine for Bootkube {
    async fn run(self) -> Result<(), EngineError> {
        tracing::info!(
            asset_dir = %self.config.asset_dir().display(),
            etcd = %self.config.etcd_endpoint(),
            self_hosted_etcd = self.config.self_hosted_etcd(),
            etcd_auth_enabled = self.config.etcd_auth_enabled(),
            service_cluster_ip_range = %self.config.service_cluster_ip_range(),
            cluster_cidr = %self.config.cluster_cidr(),
            "Running bootstrap"
        );

        let tls = self.assets.load_etcd_tls().await?;
        let checker = EtcdHealthChecker::new(self.config.etcd_endpoint(), tls.as_ref())?;
        checker
            .wait_until_healthy(&self.backoff, self.etcd_ready_attempts)
            .await?;

        let staged = self.stage_bootstrap_manifests().await?;
        tracing::info!(
            staged,
            pod_manifest_path = %self.config.pod_manifest_path().display(),
            self_hosted_manifests = %self.assets.manifests_dir().display(),
            kubeconfig = %self.assets.kubeconfig().display(),
            "Bootstrap control plane handed to kubelet"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoordStore, StartOptions};
    use url::Url;

    fn config(asset_dir: &str, service: &str, cluster: &str) -> StartupConfig {
        let opts = StartOptions {
            asset_dir: asset_dir.to_string(),
            service_cluster_ip_range: service.parse().unwrap(),
            cluster_cidr: cluster.parse().unwrap(),
            ..StartOptions::default()
        };
        let url = Url::parse(&opts.etcd_server).unwrap();
        StartupConfig::new(&opts, CoordStore::External(url))
    }

    #[test]
    fn test_overlapping_ranges_rejected_before_assets() {
        let factory = BootkubeFactory::default();
        let err = factory
            .build(config("/nonexistent", "10.2.0.0/24", "10.2.0.0/16"))
            .unwrap_err();
        assert!(matches!(err, EngineError::CidrOverlap { .. }));
    }

    #[test]
    fn test_missing_asset_dir() {
        let factory = BootkubeFactory::default();
        let err = factory
            .build(config("/nonexistent", "10.3.0.0/24", "10.2.0.0/16"))
            .unwrap_err();
        assert!(matches!(err, EngineError::AssetDirNotFound(_)));
    }
}
