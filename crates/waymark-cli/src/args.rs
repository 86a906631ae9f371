//! Command-line argument definitions for the Waymark CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand selects the operation; the global flags control
//! configuration file selection and logging verbosity.

use clap::{Parser, Subcommand};

use waymark::flowchart::Handle;

/// Command-line arguments for the Waymark flowchart tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rebuild a flowchart from a campaign snapshot and save it
    Sync {
        /// Campaign whose snapshot is read from the data directory
        #[arg(long)]
        campaign: u64,

        /// Name of the flowchart to rebuild
        #[arg(short, long, default_value = "main")]
        flowchart: String,
    },

    /// Walk a stored flowchart from its start node
    Play {
        /// Name of the flowchart to play
        #[arg(short, long, default_value = "main")]
        flowchart: String,

        /// Node ids to move to, in order
        #[arg(long = "route", value_name = "NODE_ID")]
        route: Vec<String>,
    },

    /// Draw an edge between two nodes of a stored flowchart
    Connect {
        /// Name of the flowchart to edit
        #[arg(short, long, default_value = "main")]
        flowchart: String,

        /// Id of the node the edge leaves
        source: String,

        /// Handle the edge leaves from (top, bottom, left, right)
        source_handle: Handle,

        /// Id of the node the edge enters
        target: String,

        /// Handle the edge enters at (top, bottom, left, right)
        target_handle: Handle,
    },
}
