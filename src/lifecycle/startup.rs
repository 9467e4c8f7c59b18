//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate required options before any side effect
//! - Parse the etcd endpoint and decide external vs self-hosted etcd
//! - Start the local etcd member when self-hosting
//! - Build the immutable [`StartupConfig`] and the bootstrap engine
//! - Run the engine with logging held open for its whole run
//!
//! # Design Decisions
//! - Fail fast: the first error ends the sequence, nothing is retried
//! - Nothing already started is rolled back on a later failure
//! - Collaborators are generic parameters, wired once in `main`

use crate::config::{validate_start_opts, CoordStore, StartOptions, StartupConfig};
use crate::engine::{BootstrapEngine, EngineFactory};
use crate::etcd::CoordStoreBootstrapper;
use crate::lifecycle::StartupError;
use crate::net::parse_endpoint;
use crate::observability::{LogGuard, LogSink};

/// Sequences the `bootkube start` collaborators.
#[derive(Debug)]
pub struct Startup<B, F, L> {
    etcd: B,
    engines: F,
    log_sink: L,
}

impl<B, F, L> Startup<B, F, L>
where
    B: CoordStoreBootstrapper,
    F: EngineFactory,
    L: LogSink,
{
    pub fn new(etcd: B, engines: F, log_sink: L) -> Self {
        Self {
            etcd,
            engines,
            log_sink,
        }
    }

    /// Run the startup sequence to completion.
    ///
    /// Order: validate → parse endpoint → start etcd (self-hosted only) →
    /// build config → build engine → init logging → run engine. Logs are
    /// flushed exactly once after logging is initialized, however `run` exits.
    pub async fn run(self, opts: StartOptions) -> Result<(), StartupError> {
        let Self {
            mut etcd,
            engines,
            log_sink,
        } = self;

        validate_start_opts(&opts)?;

        let endpoint = parse_endpoint(&opts.etcd_server)?;
        let store = CoordStore::new(endpoint, opts.self_hosted_etcd);

        if let CoordStore::SelfHosted(url) = &store {
            tracing::info!(endpoint = %url, "Starting self-hosted etcd member");
            etcd.start(&opts.etcd_server)
                .await
                .map_err(StartupError::CoordStoreStart)?;
        }

        let config = StartupConfig::new(&opts, store);
        let engine = engines
            .build(config)
            .map_err(StartupError::EngineConstruction)?;

        let _logs = LogGuard::acquire(log_sink)?;
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "Running bootkube");

        engine.run().await.map_err(StartupError::EngineRuntime)
    }
}
