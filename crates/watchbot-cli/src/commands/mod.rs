pub mod config;
pub mod history;
pub mod run;

use std::path::PathBuf;
use watchbot_config::PathManager;

/// `--config` when given, otherwise `config.toml` under the resolved config directory.
pub fn config_path(override_path: Option<PathBuf>) -> PathBuf {
    override_path.unwrap_or_else(|| PathManager::default().config_file())
}
