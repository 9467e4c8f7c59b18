//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing macros with structured fields
//!     → logging.rs (subscriber, non-blocking stderr writer)
//!
//! Startup:
//!     LogGuard::acquire(TracingSink) before the engine runs
//!     → drop flushes on return, error, or unwind
//! ```
//!
//! # Design Decisions
//! - Structured fields over formatted strings for machine parsing
//! - The sink sits behind [`LogSink`] so flush behaviour is testable

pub mod logging;

pub use logging::{LogError, LogFormat, LogGuard, LogSink, TracingSink};
