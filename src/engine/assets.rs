//! Rendered asset directory layout.
//!
//! # Layout
//! ```text
//! <asset-dir>/
//!     auth/kubeconfig
//!     bootstrap-manifests/   (temporary control plane, staged as static pods)
//!     manifests/             (self-hosted control plane)
//!     tls/etcd-client.{crt,key}, tls/etcd-client-ca.crt   (etcd auth only)
//! ```

use std::path::{Path, PathBuf};

use crate::engine::EngineError;
use crate::etcd::EtcdClientTls;

pub const BOOTSTRAP_MANIFESTS_DIR: &str = "bootstrap-manifests";
pub const MANIFESTS_DIR: &str = "manifests";
pub const KUBECONFIG: &str = "auth/kubeconfig";
pub const ETCD_CLIENT_CERT: &str = "tls/etcd-client.crt";
pub const ETCD_CLIENT_KEY: &str = "tls/etcd-client.key";
pub const ETCD_CLIENT_CA: &str = "tls/etcd-client-ca.crt";

const MANIFEST_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Paths to the etcd client credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtcdTlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
    pub ca: PathBuf,
}

/// A checked asset directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    root: PathBuf,
    bootstrap_manifests: PathBuf,
    manifests: PathBuf,
    kubeconfig: PathBuf,
    etcd_tls: Option<EtcdTlsPaths>,
}

impl AssetLayout {
    /// Verify the directory has the layout produced by `bootkube render`.
    pub fn load(root: &Path, etcd_auth_enabled: bool) -> Result<Self, EngineError> {
        if !root.is_dir() {
            return Err(EngineError::AssetDirNotFound(root.to_path_buf()));
        }

        let bootstrap_manifests = require(root, BOOTSTRAP_MANIFESTS_DIR, Path::is_dir)?;
        let manifests = require(root, MANIFESTS_DIR, Path::is_dir)?;
        let kubeconfig = require(root, KUBECONFIG, Path::is_file)?;

        let etcd_tls = if etcd_auth_enabled {
            Some(EtcdTlsPaths {
                cert: require(root, ETCD_CLIENT_CERT, Path::is_file)?,
                key: require(root, ETCD_CLIENT_KEY, Path::is_file)?,
                ca: require(root, ETCD_CLIENT_CA, Path::is_file)?,
            })
        } else {
            None
        };

        Ok(Self {
            root: root.to_path_buf(),
            bootstrap_manifests,
            manifests,
            kubeconfig,
            etcd_tls,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifests_dir(&self) -> &Path {
        &self.manifests
    }

    pub fn kubeconfig(&self) -> &Path {
        &self.kubeconfig
    }

    pub fn etcd_tls(&self) -> Option<&EtcdTlsPaths> {
        self.etcd_tls.as_ref()
    }

    /// Manifest files under `bootstrap-manifests/`, sorted by name.
    pub fn bootstrap_manifest_files(&self) -> Result<Vec<PathBuf>, EngineError> {
        let io_err = |source| EngineError::Io {
            path: self.bootstrap_manifests.clone(),
            source,
        };

        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.bootstrap_manifests).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let is_manifest = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext));
            if path.is_file() && is_manifest {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(EngineError::NoBootstrapManifests(
                self.bootstrap_manifests.clone(),
            ));
        }
        Ok(files)
    }

    /// Read the etcd client credentials, if etcd auth is enabled.
    pub async fn load_etcd_tls(&self) -> Result<Option<EtcdClientTls>, EngineError> {
        let Some(paths) = &self.etcd_tls else {
            return Ok(None);
        };

        Ok(Some(EtcdClientTls {
            cert_pem: read(&paths.cert).await?,
            key_pem: read(&paths.key).await?,
            ca_pem: read(&paths.ca).await?,
        }))
    }
}

fn require(root: &Path, entry: &str, exists: fn(&Path) -> bool) -> Result<PathBuf, EngineError> {
    let path = root.join(entry);
    if exists(&path) {
        Ok(path)
    } else {
        Err(EngineError::MissingAsset {
            root: root.to_path_buf(),
            entry: entry.to_string(),
        })
    }
}

async fn read(path: &Path) -> Result<Vec<u8>, EngineError> {
    tokio::fs::read(path).await.map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })
}
