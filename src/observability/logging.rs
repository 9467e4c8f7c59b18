//! Structured logging lifecycle.
//!
//! # Responsibilities
//! - Install the process-wide tracing subscriber once
//! - Guarantee buffered log lines are flushed on every exit path
//!
//! # Design Decisions
//! - Uses tracing-subscriber with a non-blocking stderr writer
//! - Text format for operators, JSON for log shipping
//! - Log level from `RUST_LOG`, default `bootkube=info`
//! - Flush is tied to [`LogGuard`]'s `Drop`, so early returns and panics flush too

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

const DEFAULT_LOG_FILTER: &str = "bootkube=info";

/// Errors from setting up logging.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] tracing_subscriber::util::TryInitError),
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// A log destination that can be initialized and flushed.
pub trait LogSink {
    fn init(&mut self) -> Result<(), LogError>;

    fn flush(&mut self);
}

/// Holds an initialized sink and flushes it exactly once when dropped.
#[derive(Debug)]
pub struct LogGuard<L: LogSink> {
    sink: L,
}

impl<L: LogSink> LogGuard<L> {
    /// Initialize `sink`. Nothing is flushed if initialization fails.
    pub fn acquire(mut sink: L) -> Result<Self, LogError> {
        sink.init()?;
        Ok(Self { sink })
    }
}

impl<L: LogSink> Drop for LogGuard<L> {
    fn drop(&mut self) {
        self.sink.flush();
    }
}

/// tracing-subscriber sink writing to stderr through tracing-appender.
#[derive(Debug)]
pub struct TracingSink {
    format: LogFormat,
    guard: Option<WorkerGuard>,
}

impl TracingSink {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            guard: None,
        }
    }
}

impl LogSink for TracingSink {
    fn init(&mut self) -> Result<(), LogError> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

        let fmt_layer: Box<dyn Layer<Registry> + Send + Sync> = match self.format {
            LogFormat::Text => tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_target(false)
                .boxed(),
            LogFormat::Json => tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .boxed(),
        };

        tracing_subscriber::registry()
            .with(fmt_layer.with_filter(filter))
            .try_init()?;

        self.guard = Some(guard);
        Ok(())
    }

    fn flush(&mut self) {
        // dropping the worker guard drains the non-blocking writer
        drop(self.guard.take());
    }
}
