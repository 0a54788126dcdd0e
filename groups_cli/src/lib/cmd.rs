//! Commands for the groups CLI
//!

use std::path::PathBuf;

use clap::{self, Parser, Subcommand};

use groups_core::logging::LevelFilter;

/// Manage identity-service groups from a declarative config
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
pub(crate) struct GroupsArgs {
    #[clap(subcommand)]
    pub(crate) command: GroupsCommand,
    #[clap(global = true, short = 'v', long)]
    pub(crate) log_level: Option<LevelFilter>,
    /// The declared groups
    #[clap(global = true, short, long, default_value = "groups.yaml")]
    pub(crate) config: PathBuf,
    /// Where the recorded state is kept
    #[clap(global = true, short, long, default_value = "groups_state.json")]
    pub(crate) state: PathBuf,
    /// Credentials file. Defaults to ~/.groups/credentials.yaml
    #[clap(global = true, long)]
    pub(crate) credentials: Option<PathBuf>,
    /// Seconds to keep retrying reads that come back empty
    #[clap(global = true, long, default_value = "1200")]
    pub(crate) read_timeout: u64,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum GroupsCommand {
    /// Show the changes needed to match the config
    Plan,
    /// Make the changes needed to match the config
    Apply,
    /// Refresh and print the recorded state of a group
    Read {
        /// the group's address in the config
        address: String,
    },
    /// Start tracking an existing group
    Import {
        /// the address to record the group under
        address: String,
        /// the remote group id
        group_id: String,
    },
    /// Delete groups and stop tracking them
    Destroy {
        /// only destroy this group
        address: Option<String>,
    },
}
