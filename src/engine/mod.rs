//! Bootstrap engine.
//!
//! # Data Flow
//! ```text
//! StartupConfig (moved in)
//!     → EngineFactory::build
//!         → CIDR overlap check
//!         → assets.rs (rendered layout present, bootstrap manifests listed)
//!     → BootstrapEngine::run
//!         → wait for etcd health
//!         → stage bootstrap manifests into the kubelet pod manifest dir
//! ```
//!
//! # Design Decisions
//! - Construction fails fast on anything detectable without I/O to etcd
//! - The engine owns its own etcd wait policy; the caller never retries

pub mod assets;
pub mod bootkube;

use std::path::PathBuf;

use thiserror::Error;

use crate::config::StartupConfig;
use crate::etcd::EtcdError;
use crate::net::Cidr;

pub use assets::AssetLayout;
pub use bootkube::{Bootkube, BootkubeFactory};

/// Errors from building or running the bootstrap engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("asset directory {} does not exist", .0.display())]
    AssetDirNotFound(PathBuf),

    #[error("asset directory {} is missing {entry}", root.display())]
    MissingAsset { root: PathBuf, entry: String },

    #[error("service cluster IP range {service} overlaps cluster CIDR {cluster}")]
    CidrOverlap { service: Cidr, cluster: Cidr },

    #[error("no bootstrap manifests found in {}", .0.display())]
    NoBootstrapManifests(PathBuf),

    #[error("etcd unavailable: {0}")]
    Etcd(#[from] EtcdError),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Builds an engine from a validated configuration.
pub trait EngineFactory {
    type Engine: BootstrapEngine;

    fn build(&self, config: StartupConfig) -> Result<Self::Engine, EngineError>;
}

/// A constructed engine; `run` consumes it and returns when bootstrap is done.
#[allow(async_fn_in_trait)]
pub trait BootstrapEngine {
    async fn run(self) -> Result<(), EngineError>;
}
