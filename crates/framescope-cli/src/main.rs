//! Framescope CLI - frame discovery, relation clustering, and hierarchy
//! presentation over a document corpus.

use clap::Parser;
use framescope_cli::{commands, Cli, Command};
use tracing_subscriber::EnvFilter;

// Deliberately synchronous: the providers own their async runtimes
// internally, and nesting them inside a tokio main would panic.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> framescope_cli::Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Command::Articulate(args) => commands::execute_articulate(args),
        Command::Relate(args) => commands::execute_relate(args),
        Command::Reduce(args) => commands::execute_reduce(args),
        Command::Order(args) => commands::execute_order(args),
    }
}
