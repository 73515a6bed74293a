//! CLI command implementations.

pub mod config;
pub mod export;
pub mod function;
pub mod init;
pub mod plan;
pub mod route;

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Application name (default: current directory name).
    pub name: Option<String>,

    /// Build output directory.
    #[arg(short, long, default_value = "dist")]
    pub build_dir: String,

    /// Overwrite an existing config without asking.
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the plan command.
#[derive(Args)]
pub struct PlanArgs {
    /// List every object.
    #[arg(long)]
    pub objects: bool,
}

/// Arguments for the export command.
#[derive(Args)]
pub struct ExportArgs {
    /// Directory to write the desired state to.
    #[arg(short, long)]
    pub out: PathBuf,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the route command.
#[derive(Args)]
pub struct RouteArgs {
    /// Request paths to route.
    #[arg(required = true)]
    pub paths: Vec<String>,
}

/// Arguments for the function command.
#[derive(Args)]
pub struct FunctionArgs {
    /// Function name to render the definition with.
    #[arg(long, default_value = "rewrite-function")]
    pub name: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Validate the config file.
    Validate,
}
