use crate::output::{Output, OutputFormat};
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;
use watchbot_config::{mask_secret, Config, PathManager};

pub fn run_config(cmd: ConfigCommands, config_path: &Path, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(config_path, full, output),
        ConfigCommands::Init {
            token,
            api_key,
            force,
        } => init_config(config_path, token, api_key, force, output),
    }
}

fn show_config(config_path: &Path, full: bool, output: &Output) -> Result<()> {
    if !config_path.exists() {
        output.warn(format!("Configuration file not found at: {}", config_path.display()));
        output.info("Create one with 'watchbot config init'.");
        return Ok(());
    }

    let mut config = Config::load_from_file(config_path)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_path.display(), e))?;
    config.apply_env_overrides();

    let secret = |value: &str| if full { value.to_string() } else { mask_secret(value) };
    let database = config.database_path(&PathManager::default());
    let log_file = config
        .logging
        .file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stderr".to_string());

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            let mut table = Table::new();
            table.set_header(vec![
                Cell::new("Setting").add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
            ]);
            table.add_row(vec![
                Cell::new("Config file"),
                Cell::new(config_path.display().to_string()),
            ]);
            table.add_row(vec![
                Cell::new("Telegram token"),
                Cell::new(secret(&config.telegram.token)),
            ]);
            table.add_row(vec![
                Cell::new("Poll timeout"),
                Cell::new(format!("{}s", config.telegram.poll_timeout_secs)),
            ]);
            table.add_row(vec![Cell::new("TMDB API key"), Cell::new(secret(&config.tmdb.api_key))]);
            table.add_row(vec![Cell::new("TMDB language"), Cell::new(&config.tmdb.language)]);
            table.add_row(vec![Cell::new("Database"), Cell::new(database.display().to_string())]);
            table.add_row(vec![Cell::new("Log file"), Cell::new(&log_file)]);
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

            println!("\n{}", "Configuration".bright_cyan().bold());
            println!("{}", table);

            if let Err(e) = config.validate() {
                output.warn(format!("Configuration is incomplete: {}", e));
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_path.display().to_string(),
                "telegram": {
                    "token": secret(&config.telegram.token),
                    "poll_timeout_secs": config.telegram.poll_timeout_secs,
                },
                "tmdb": {
                    "api_key": secret(&config.tmdb.api_key),
                    "language": &config.tmdb.language,
                },
                "database": database.display().to_string(),
                "log_file": log_file,
                "valid": config.validate().is_ok(),
            }));
        }
    }

    Ok(())
}

fn init_config(
    config_path: &Path,
    token: Option<String>,
    api_key: Option<String>,
    force: bool,
    output: &Output,
) -> Result<()> {
    if config_path.exists() && !force {
        output.error(format!(
            "Configuration file already exists at {}. Use --force to overwrite it.",
            config_path.display()
        ));
        return Err(eyre!("Refusing to overwrite {}", config_path.display()));
    }

    let token = match token {
        Some(token) => token,
        None => prompt_secret("Telegram bot token: ")?,
    };
    let api_key = match api_key {
        Some(api_key) => api_key,
        None => prompt_secret("TMDB API key: ")?,
    };

    let config = write_config(config_path, token, api_key)?;
    output.success(format!("Configuration saved to {}", config_path.display()));

    if let Err(e) = config.validate() {
        output.warn(format!("{}. Edit the file before running the bot.", e));
    }
    Ok(())
}

fn prompt_secret(prompt: &str) -> Result<String> {
    rpassword::prompt_password(prompt).map_err(|e| eyre!("Failed to read input: {}", e))
}

/// Blank values become placeholders so the file is still a usable template.
fn write_config(config_path: &Path, token: String, api_key: String) -> Result<Config> {
    let template = Config::template();
    let token = Some(token.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or(template.telegram.token);
    let api_key = Some(api_key.trim().to_string())
        .filter(|k| !k.is_empty())
        .unwrap_or(template.tmdb.api_key);

    let config = Config::new(token, api_key);
    config
        .save_to_file(config_path)
        .map_err(|e| eyre!("Failed to write {}: {}", config_path.display(), e))?;
    Ok(config)
}
