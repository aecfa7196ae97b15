//! CLI command structure using clap

use clap::{Parser, Subcommand};
use std::ffi::OsString;

#[derive(Parser)]
#[command(name = "gopin")]
#[command(version, about = "Run pinned Go toolchain releases transparently", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download and install a toolchain version without running it
    Download {
        /// Version to install (e.g., "go1.19.5")
        version: String,
    },

    /// Run a toolchain version, installing it on first use
    #[command(trailing_var_arg = true)]
    Run {
        /// Version to run (e.g., "go1.19.5")
        version: String,

        /// Arguments forwarded to the toolchain binary
        #[arg(allow_hyphen_values = true)]
        args: Vec<OsString>,
    },

    /// List cached toolchain versions
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
