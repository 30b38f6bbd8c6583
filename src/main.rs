mod cli;
mod core;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::core::config::{AppConfig, TEMPLATE};
use crate::core::error::ConfigError;

#[derive(Parser)]
#[command(name = "plantrack", about = "Coding-plan usage tracking CLI for AI providers", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the config file (default: ~/.config/plantrack/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Shorthand for JSON output
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and display provider usage (default)
    Usage,
    /// Print a compact one-line status string
    Status {
        /// Refresh every N seconds instead of exiting
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate a template config file
    Init,
    /// Validate the config file
    Check,
}

fn load_config_or_exit(path: Option<&std::path::Path>) -> AppConfig {
    match AppConfig::load(path) {
        Ok(config) => config,
        Err(ConfigError::NotFound(path)) => {
            eprintln!("Error: config file not found: {}", path.display());
            eprintln!("\nCreate one with this structure:\n\n{}", TEMPLATE);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Some(Commands::Config { action }) => match action {
            ConfigAction::Init => cli::config_cmd::init(config_path)?,
            ConfigAction::Check => cli::config_cmd::check(config_path)?,
        },
        Some(Commands::Status { interval }) => {
            let config = load_config_or_exit(config_path);
            let opts = output_options(&cli, &config);
            cli::status_cmd::run(&config, interval, &opts).await?;
        }
        None | Some(Commands::Usage) => {
            let config = load_config_or_exit(config_path);
            let opts = output_options(&cli, &config);
            cli::usage_cmd::run(&config, &opts).await?;
        }
    }

    Ok(())
}

fn output_options(cli: &Cli, config: &AppConfig) -> OutputOptions {
    let format = if cli.json || config.settings.default_format == "json" {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    OutputOptions {
        format,
        pretty: cli.pretty,
        use_color: cli::output::detect_color(&config.settings.color, cli.no_color),
        verbose: cli.verbose,
    }
}
