//! Required-flag validation for `bootkube start`.
//!
//! # Design Decisions
//! - Pure function over [`StartOptions`]; runs before any process or network action
//! - Reports the first missing flag, etcd server before asset dir

use thiserror::Error;

use crate::config::schema::StartOptions;

/// A required flag was empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required flag: --{0}")]
    MissingFlag(&'static str),
}

impl ValidationError {
    /// Name of the offending flag, without the leading dashes.
    pub fn flag(&self) -> &'static str {
        match self {
            ValidationError::MissingFlag(flag) => flag,
        }
    }
}

/// Check that every required start option is present.
pub fn validate_start_opts(opts: &StartOptions) -> Result<(), ValidationError> {
    if opts.etcd_server.is_empty() {
        return Err(ValidationError::MissingFlag("etcd-server"));
    }
    if opts.asset_dir.is_empty() {
        return Err(ValidationError::MissingFlag("asset-dir"));
    }
    Ok(())
}
