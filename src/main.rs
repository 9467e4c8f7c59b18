//! bootkube
//!
//! # Architecture Overview
//!
//! ```text
//!   bootkube start --asset-dir ... --etcd-server ...
//!        │
//!        ▼
//!   ┌──────────┐   ┌──────────────┐   ┌────────────────────────────────────────┐
//!   │   cli    │──▶│    config    │──▶│            lifecycle::Startup          │
//!   │ (clap)   │   │ file + flags │   │                                        │
//!   └──────────┘   └──────────────┘   │ validate → parse endpoint              │
//!                                     │   → [self-hosted] etcd::LocalEtcd      │
//!                                     │   → StartupConfig → engine::Bootkube   │
//!                                     │   → LogGuard → engine.run()            │
//!                                     └────────────────────────────────────────┘
//!                                                       │
//!                                                       ▼
//!                                              exit code 0 / 1
//! ```

use std::process::ExitCode;

use clap::Parser;

use bootkube::cli::{Cli, Command, StartArgs};
use bootkube::config::{load_config, BootkubeFile};
use bootkube::engine::BootkubeFactory;
use bootkube::etcd::LocalEtcd;
use bootkube::observability::TracingSink;
use bootkube::Startup;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Version => {
            println!("bootkube {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Command::Start(args) => match start(args).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

/// Composition root: resolve options once and wire the real collaborators.
async fn start(args: StartArgs) -> Result<(), Box<dyn std::error::Error>> {
    let file = match &args.config {
        Some(path) => load_config(path)?,
        None => BootkubeFile::default(),
    };
    let opts = args.resolve(&file.start);

    let startup = Startup::new(
        LocalEtcd::new(file.etcd),
        BootkubeFactory::default(),
        TracingSink::new(args.log_format),
    );

    startup.run(opts).await?;
    Ok(())
}
