//! CLI command definitions
//!
//! Defines the clap commands and global options for the API checker.

use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Options accepted by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Base URL of the running application (default: https://localhost:7226)
    #[arg(long, env = "APICHECK_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Configuration file (default: the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show request and response details in the trace
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Output results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Accept invalid TLS certificates
    #[arg(long, global = true, conflicts_with = "strict_tls")]
    pub insecure: bool,

    /// Reject invalid TLS certificates even if the config accepts them
    #[arg(long, global = true)]
    pub strict_tls: bool,

    /// Value substituted for {ts} in unique fields (default: current unix time)
    #[arg(long, global = true)]
    pub stamp: Option<u64>,

    /// Also write logs to a file; uses the default log location when no path is given
    #[arg(long, global = true, num_args = 0..=1, value_name = "PATH")]
    pub log_file: Option<Option<PathBuf>>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a user, log in and check the session cookie
    Auth,

    /// Log in as admin, create a menu item and verify it
    Menu,

    /// Register a customer, place an order and verify it
    Order,

    /// Run every scenario; a failure does not stop the remaining ones
    All,

    /// Run the scenarios listed in a YAML suite file
    Suite {
        /// Path to the YAML suite file
        path: PathBuf,
    },

    /// List available scenarios
    List,
}
