//! etcd (coordination store) integration.
//!
//! # Data Flow
//! ```text
//! CoordStore::SelfHosted(endpoint)
//!     → launcher.rs (spawn etcd member, keep child alive)
//!     → health.rs (poll <endpoint>/health until {"health":"true"})
//!
//! Bootstrap engine
//!     → health.rs (wait for etcd before staging the control plane)
//! ```
//!
//! # Design Decisions
//! - Launching is behind the [`CoordStoreBootstrapper`] trait so startup can be
//!   exercised without an etcd binary
//! - A member that starts successfully is left running; pivoting it into the
//!   cluster is the engine's concern

pub mod health;
pub mod launcher;

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

pub use health::{parse_health, EtcdClientTls, EtcdHealthChecker};
pub use launcher::LocalEtcd;

/// Errors raised while launching or probing etcd.
#[derive(Debug, Error)]
pub enum EtcdError {
    #[error("invalid etcd endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("failed to build etcd client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("etcd health request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("malformed etcd health response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("etcd reported unhealthy: {0}")]
    Unhealthy(String),

    #[error("etcd not healthy after {attempts} attempts: {last}")]
    NotReady { attempts: u32, last: String },

    #[error("failed to spawn {}: {source}", binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("etcd exited before becoming healthy: {0}")]
    Exited(ExitStatus),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Starts a local coordination store member.
#[allow(async_fn_in_trait)]
pub trait CoordStoreBootstrapper {
    /// Launch a member serving clients on `endpoint` and return once it is healthy.
    async fn start(&mut self, endpoint: &str) -> Result<(), EtcdError>;
}
