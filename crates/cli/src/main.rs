//! s3interact - interactive S3 object storage client
//!
//! A menu-driven terminal client for AWS S3 and S3-compatible services.

use clap::Parser;
use s3interact::commands::{self, Cli};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used with `--debug`: our crates only, the SDK stays at warn
const DEBUG_FILTER: &str = "warn,s3interact=debug,s3i_core=debug,s3i_s3=debug";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the menu
    let filter = if cli.debug {
        EnvFilter::new(DEBUG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
