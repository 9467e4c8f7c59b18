//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize into BootkubeFile)
//!
//! CLI flags / BOOTKUBE_* env
//!     → cli::StartArgs::resolve (flags win over file, file over defaults)
//!     → StartOptions (raw)
//!     → validation.rs (required flags present)
//!     → StartupConfig (validated, immutable)
//!     → moved into the bootstrap engine
//! ```
//!
//! # Design Decisions
//! - No process-wide mutable flag state; options are built once at the composition root
//! - Config is immutable once built
//! - Every file key is optional so partial files work

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BootkubeFile, CoordStore, EtcdLaunchConfig, StartFileSection, StartOptions, StartupConfig,
};
pub use validation::{validate_start_opts, ValidationError};
