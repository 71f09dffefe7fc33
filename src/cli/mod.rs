//! Command-line interface for kinosync.
//!
//! Ingest a catalog, resolve identifiers and maintain the local library
//! without an embedding host application.

mod commands;

pub use commands::{Cli, Commands, run_command};
