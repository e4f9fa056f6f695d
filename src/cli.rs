//! CLI argument parsing.
//!
//! The CLI is thin: it resolves configuration and hands off to the matcher,
//! the workflow session, or the admin store helpers.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "officina",
    version,
    about = "Symptom-driven diagnostic checklists and repair reports",
    after_help = "Commands:\n  match <complaint...>          Rank procedures for a client complaint\n  session                       Guided workflow: cause, verify, repair, report\n  admin <action>                Manage the local procedures override\n  config <action>               Create or inspect the config file\n\nExamples:\n  officina match la batteria è scarica\n  officina --data data/procedures.json session\n  officina admin save my-procedures.json\n  officina config init",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (defaults to <config dir>/officina/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Default procedures document: file path or http(s) URL
    #[arg(long, global = true, value_name = "PATH|URL")]
    pub data: Option<String>,

    /// Directory of the persistent override store
    #[arg(long, global = true, value_name = "DIR", conflicts_with = "ephemeral")]
    pub store: Option<PathBuf>,

    /// Keep the override store in memory for this run only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Emit debug logs on stderr
    #[arg(long, global = true)]
    pub verbose: bool,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Match(MatchArgs),
    Session(SessionArgs),
    #[command(subcommand)]
    Admin(AdminCommand),
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Match command inputs.
#[derive(Parser, Debug)]
#[command(about = "Rank procedures for a client complaint")]
pub struct MatchArgs {
    /// Complaint text, as the client said it
    #[arg(value_name = "TEXT", num_args = 0..)]
    pub query: Vec<String>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Session command inputs.
#[derive(Parser, Debug)]
#[command(about = "Run the guided diagnostic workflow")]
pub struct SessionArgs {
    /// Read session commands from a file instead of stdin
    #[arg(long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Do not re-render the view after each command
    #[arg(long)]
    pub quiet: bool,

    /// Disable narration
    #[arg(long)]
    pub silent: bool,
}

#[derive(Subcommand, Debug)]
#[command(about = "Manage the local procedures override")]
pub enum AdminCommand {
    /// Print the default procedures document
    ShowDefault,
    /// Print the stored override
    ShowOverride,
    /// Validate a document and store it as the override
    Save {
        #[arg(value_name = "PATH")]
        file: PathBuf,
    },
    /// Remove the stored override
    Clear,
}

#[derive(Subcommand, Debug)]
#[command(about = "Create or inspect the config file")]
pub enum ConfigCommand {
    /// Write the effective settings (defaults plus flags) to the config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config
    Show,
}
