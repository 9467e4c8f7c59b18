//! Resilience helpers.
//!
//! # Design Decisions
//! - The startup sequence itself never retries; only collaborators that wait
//!   for etcd readiness (the local launcher and the engine) use backoff
//! - Jitter avoids lockstep probing when several nodes bootstrap at once

pub mod backoff;

pub use backoff::Backoff;
