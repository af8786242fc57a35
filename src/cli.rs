//! Command-line interface definitions for pbxsync.
//!
//! The CLI definitions are shared between the main binary and build tools
//! (like xtask) for man page generation.
//!
//! Note: Field-level documentation is provided via clap attributes, so we
//! allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for pbxsync.
///
/// Without a subcommand, pbxsync adds new source files to the project.
#[derive(Parser)]
#[command(
    name = "pbxsync",
    version = crate::VERSION,
    about = "Add new source files to an Xcode project",
    long_about = "Scans the source directory for files the Xcode project does not reference yet \
                  and adds their file references, build files, Sources phase entries and group \
                  entries to project.pbxproj"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Project name (<NAME>.xcodeproj); detected when omitted
    #[arg(short, long, value_name = "NAME")]
    pub project: Option<String>,

    /// Directory to scan for sources (default: the project name)
    #[arg(short, long, value_name = "DIR")]
    pub source_root: Option<PathBuf>,

    /// Show what would be added without writing the project file
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Configuration file (default: pbxsync.toml)
    #[arg(short, long, global = true, env = "PBXSYNC_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the effective configuration
    Config {
        /// Configuration key (e.g. sources.extension)
        key: Option<String>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
