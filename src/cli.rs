//! Command-line interface definitions and parsing
//!
//! Defines the `kbm` command structure with `clap`. Running `kbm` without a
//! subcommand opens the interactive menu.
//!
//! # Commands
//!
//! - **init**: create the catalog for the repository
//! - **scan**: reconcile the working tree with the catalog
//! - **add / rm**: add or delete a single catalogued file
//! - **tag / untag**: attach or detach tags
//! - **search / list / tags**: query the catalog
//! - **cleanup**: drop catalogued files that no longer exist
//! - **config / setup**: manage settings
//! - **git**: clone, stage, commit and push the repository
//!
//! # Examples
//!
//! ```
//! use kbmanager::cli::{Cli, Commands};
//! use clap::Parser;
//!
//! let cli = Cli::parse_from(["kbm", "tag", "notes.md", "draft"]);
//! assert!(matches!(cli.command, Some(Commands::Tag { .. })));
//! ```

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "kbm")]
#[command(about = "A repository-scoped file catalog with tags", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Repository directory (overrides config)
    #[arg(short = 'r', long = "repo", value_name = "PATH", global = true)]
    pub repo: Option<PathBuf>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create the catalog database for the repository
    Init,

    /// Add every new file in the repository to the catalog
    #[command(visible_alias = "s")]
    Scan,

    /// Add a single file path to the catalog
    Add {
        /// Path relative to the repository root, using `/`
        file: String,
    },

    /// List catalogued files with their tags
    #[command(visible_alias = "ls")]
    List,

    /// Attach tags to a catalogued file
    #[command(visible_alias = "t")]
    Tag {
        file: String,
        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
    },

    /// Detach tags from a catalogued file
    Untag {
        file: String,
        #[arg(required = true, num_args = 1..)]
        tags: Vec<String>,
    },

    /// List the files carrying a tag
    #[command(visible_alias = "f")]
    Search { tag: String },

    /// Remove a file and its tag associations from the catalog
    #[command(visible_alias = "delete")]
    Rm { file: String },

    /// List all tags, including unused ones
    Tags {
        /// Show how many files carry each tag
        #[arg(short = 'c', long = "counts")]
        counts: bool,
    },

    /// Remove catalogued files that no longer exist on disk
    #[command(visible_alias = "c")]
    Cleanup {
        /// Only list what would be removed
        #[arg(short = 'n', long = "dry-run")]
        dry_run: bool,

        /// Do not ask for confirmation
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Interactively edit repository and identity settings
    Setup,

    /// Version control operations on the repository
    Git {
        #[command(subcommand)]
        command: GitCommands,
    },

    /// Open the interactive menu (default)
    #[command(visible_alias = "m")]
    Menu,
}

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print every setting
    Show,

    /// Print the config file location
    Path,

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., user_email)
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., quiet=true)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },
}

/// Version control subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum GitCommands {
    /// Clone the configured remote into the repository directory
    Clone,

    /// Stage all changes
    Add,

    /// Commit staged changes with the configured identity
    Commit {
        #[arg(short = 'm', long = "message")]
        message: String,
    },

    /// Push the current branch to the configured remote
    Push,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the command, defaulting to the interactive menu
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Menu)
    }
}

/// Split a `KEY=VALUE` argument; the value may be empty or contain `=`
///
/// # Errors
///
/// Returns a message if there is no `=` or the key is empty.
pub fn parse_setting(setting: &str) -> Result<(&str, &str), String> {
    match setting.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(format!("Expected KEY=VALUE, got '{setting}'")),
    }
}
