//! Edge CLI - Command line tool for single-page app edge deployments.
//!
//! Commands:
//! - `edge init` - Create edge.toml with a fresh identity seed
//! - `edge plan` - Compose the desired state and summarize it
//! - `edge export` - Write the desired state to a directory
//! - `edge route` - Show how request paths are routed
//! - `edge function` - Print the edge rewrite function
//! - `edge config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use edge_observability::LogFormat;

use commands::{ConfigArgs, ExportArgs, FunctionArgs, InitArgs, PlanArgs, RouteArgs};

/// Edge CLI - Deploy single-page apps behind an edge distribution
#[derive(Parser)]
#[command(name = "edge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Environment overrides to apply
    #[arg(short, long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new app configuration
    Init(InitArgs),

    /// Compose the desired state and show a summary
    Plan(PlanArgs),

    /// Write the desired state to a directory
    Export(ExportArgs),

    /// Show how request paths are routed at the edge
    Route(RouteArgs),

    /// Print the edge rewrite function
    Function(FunctionArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

impl Commands {
    /// Whether the command reads the config file.
    fn needs_config(&self) -> bool {
        !matches!(
            self,
            Commands::Init(_) | Commands::Route(_) | Commands::Function(_)
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    let format = if cli.json { LogFormat::Json } else { LogFormat::Human };
    if let Err(e) = edge_observability::init(format, cli.verbose) {
        output.warn(&format!("Logging disabled: {}", e));
    }

    // Load config, skipped for commands that never read it
    let loaded = if cli.command.needs_config() {
        context::Context::load(cli.config.as_deref(), cli.env, output.clone())
    } else {
        context::Context::unconfigured(cli.env, output.clone())
    };
    let ctx = match loaded {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Commands::Init(args) => commands::init::run(args, &ctx).await,
        Commands::Plan(args) => commands::plan::run(args, &ctx).await,
        Commands::Export(args) => commands::export::run(args, &ctx).await,
        Commands::Route(args) => commands::route::run(args, &ctx).await,
        Commands::Function(args) => commands::function::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn test_config_free_commands() {
        assert!(!command(&["edge", "init", "--force"]).needs_config());
        assert!(!command(&["edge", "route", "/about"]).needs_config());
        assert!(!command(&["edge", "function"]).needs_config());
        assert!(command(&["edge", "plan"]).needs_config());
        assert!(command(&["edge", "config", "show"]).needs_config());
    }
}
