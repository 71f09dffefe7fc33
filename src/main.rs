//! Kinosync - media catalog availability and local library sync.
//!
//! Ingests a streaming catalog (live paged queries or an integrity-
//! checked snapshot), works out what is currently playable, resolves
//! external identifiers, and maintains a host-indexable library of
//! descriptor and playback pointer files on disk.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod host;
pub mod resolver;
pub mod source;
pub mod sync;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("kinosync=info".parse().unwrap()))
        .init();

    cli::run_command(&args)
}
