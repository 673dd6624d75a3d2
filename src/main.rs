//! Restaurant API Check - end-to-end checks for the restaurant management API
//!
//! Runs fixed user journeys against a running server and exits non-zero
//! when any of them fails.

use apicheck::commands::{Commands, GlobalArgs};
use apicheck::common::logging;
use apicheck::cli;
use clap::Parser;

#[derive(Parser)]
#[command(name = "apicheck", about = "End-to-end checks for the restaurant management API")]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_file = match &cli.global.log_file {
        None => None,
        Some(Some(path)) => Some(path.clone()),
        Some(None) => logging::default_log_path(),
    };
    let guard = logging::init_cli(cli.global.verbose, log_file.as_deref());

    let code = match cli::dispatch(cli.command, &cli.global).await {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    };

    // Flush buffered log output before exiting
    drop(guard);
    std::process::exit(code);
}
