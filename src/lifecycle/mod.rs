//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     StartOptions → Validate → Parse etcd endpoint
//!         → [self-hosted] start local etcd
//!         → StartupConfig → build engine
//!         → LogGuard acquired → engine.run() → LogGuard dropped (flush)
//!
//! Errors (error.rs):
//!     StartupError, one variant per failing step
//! ```
//!
//! # Design Decisions
//! - Strictly sequential: no step starts before the previous one returns
//! - etcd always starts before the engine is constructed
//! - Exit code is decided by the caller from the returned error

pub mod error;
pub mod startup;

pub use error::StartupError;
pub use startup::Startup;
