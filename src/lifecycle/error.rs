//! Startup error taxonomy.

use thiserror::Error;

use crate::config::ValidationError;
use crate::engine::EngineError;
use crate::etcd::EtcdError;
use crate::net::EndpointError;
use crate::observability::LogError;

/// First failure encountered by [`Startup::run`](crate::lifecycle::Startup::run).
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    EndpointParse(#[from] EndpointError),

    #[error("failed to start etcd: {0}")]
    CoordStoreStart(#[source] EtcdError),

    #[error("failed to construct bootstrap engine: {0}")]
    EngineConstruction(#[source] EngineError),

    #[error("failed to initialize logging: {0}")]
    LogInit(#[from] LogError),

    #[error("bootstrap failed: {0}")]
    EngineRuntime(#[source] EngineError),
}
