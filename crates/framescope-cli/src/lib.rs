//! Framescope CLI library.
//!
//! Drives the full pipeline as four subcommands over line-delimited JSON
//! artifacts: `articulate` (extract frames from documents), `relate` (the
//! incremental clustering pass), `reduce` (graph reduction), and `order`
//! (hierarchy presentation and annotation export).

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod io;
pub mod report;

pub use cli::{Cli, Command};
pub use error::{CliError, Result};
