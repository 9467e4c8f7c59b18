//! bootkube: bootstraps a self-hosted Kubernetes control plane.
//!
//! This crate holds the `bootkube start` entry point: option validation, the
//! optional local etcd member, the immutable startup configuration, and the
//! bootstrap engine it hands control to.

pub mod cli;
pub mod config;
pub mod engine;
pub mod etcd;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod resilience;

pub use config::{CoordStore, StartOptions, StartupConfig};
pub use lifecycle::{Startup, StartupError};
