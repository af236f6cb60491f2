use clap::{ArgAction, Parser, Subcommand};
use commands::{config, history, run};
use std::path::PathBuf;
use watchbot_config::Config;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "watchbot")]
#[command(about = "Watchbot - a Telegram bot that remembers what you watched")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Path to config.toml (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot until interrupted
    #[command(long_about = "Connect to Telegram with long polling and answer chat commands until Ctrl-C. Requires a valid config with a bot token and a TMDB API key.")]
    Run,
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Print a user's watched list from the local database
    History {
        /// Telegram chat id of the user
        #[arg(long, value_name = "ID")]
        user: i64,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks sensitive data)
    Show {
        /// Show secrets unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a new configuration file
    #[command(long_about = "Write config.toml with the given bot token and TMDB API key. Missing values are prompted for with hidden input. An existing file is only replaced with --force.")]
    Init {
        /// Telegram bot token (if not provided, will prompt)
        #[arg(long)]
        token: Option<String>,

        /// TMDB API key (if not provided, will prompt)
        #[arg(long)]
        api_key: Option<String>,

        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config_path = commands::config_path(cli.config.clone());

    // Only the long-running bot writes to the configured log file
    let log_file = match cli.command {
        Commands::Run => Config::load_from_file(&config_path)
            .ok()
            .and_then(|c| c.logging.file),
        _ => None,
    };
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Run => run::run_bot(&config_path, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &config_path, &output),
        Commands::History { user } => history::show_history(&config_path, user, &output),
    }
}
