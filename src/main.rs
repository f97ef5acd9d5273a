//! SizeSleuth — find the largest files and folders in a directory tree.
//!
//! Thin binary entry point. All logic lives in the `sizesleuth-core`
//! and `sizesleuth-cli` crates.

use clap::Parser;
use sizesleuth_cli::Args;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    tracing::debug!("SizeSleuth starting");
    sizesleuth_cli::run(&args)
}

/// Structured logging to stderr; stdout is reserved for the report.
/// `RUST_LOG` overrides the level chosen by `--verbose`.
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
