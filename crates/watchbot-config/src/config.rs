use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths::PathManager;

/// Environment variable that overrides `telegram.token`
pub const TELEGRAM_TOKEN_ENV: &str = "WATCHBOT_TELEGRAM_TOKEN";
/// Environment variable that overrides `tmdb.api_key`
pub const TMDB_API_KEY_ENV: &str = "WATCHBOT_TMDB_API_KEY";

const TOKEN_PLACEHOLDER: &str = "YOUR_BOT_TOKEN";
const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub token: String,
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TmdbConfig {
    pub api_key: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// SQLite file; defaults to `<data_dir>/watched.db`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Daily-rotated log file; logs go to stderr when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_poll_timeout_secs() -> u64 {
    60
}

fn default_language() -> String {
    "en-US".to_string()
}

impl Config {
    pub fn new(token: String, api_key: String) -> Self {
        Self {
            telegram: TelegramConfig {
                token,
                poll_timeout_secs: default_poll_timeout_secs(),
                api_url: None,
            },
            tmdb: TmdbConfig {
                api_key,
                language: default_language(),
                base_url: None,
                image_base_url: None,
            },
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Config with placeholder secrets, written by `config init` when nothing is supplied
    pub fn template() -> Self {
        Self::new(TOKEN_PLACEHOLDER.to_string(), API_KEY_PLACEHOLDER.to_string())
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Read the file, apply environment overrides, and validate.
    /// Any failure here is fatal for the bot.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?;
        config.apply_env_overrides();
        config
            .validate()
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Replace secrets with non-empty values from `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(TELEGRAM_TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
            self.telegram.token = token;
        }
        if let Some(api_key) = lookup(TMDB_API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.tmdb.api_key = api_key;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let token = self.telegram.token.trim();
        if token.is_empty() || token == TOKEN_PLACEHOLDER {
            return Err(anyhow::anyhow!("telegram.token is not configured"));
        }

        let api_key = self.tmdb.api_key.trim();
        if api_key.is_empty() || api_key == API_KEY_PLACEHOLDER {
            return Err(anyhow::anyhow!("tmdb.api_key is not configured"));
        }

        if self.telegram.poll_timeout_secs == 0 {
            return Err(anyhow::anyhow!("telegram.poll_timeout_secs must be greater than zero"));
        }

        if self.tmdb.language.trim().is_empty() {
            return Err(anyhow::anyhow!("tmdb.language cannot be empty"));
        }

        Ok(())
    }

    pub fn database_path(&self, paths: &PathManager) -> PathBuf {
        self.storage
            .database
            .clone()
            .unwrap_or_else(|| paths.database_file())
    }
}

/// Mask a secret for display, keeping the last four characters
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::new("123:abc".to_string(), "tmdb_key".to_string());
        config.tmdb.language = "ru-RU".to_string();
        config.storage.database = Some(PathBuf::from("/tmp/watched.db"));

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.telegram.token, "123:abc");
        assert_eq!(loaded.tmdb.api_key, "tmdb_key");
        assert_eq!(loaded.tmdb.language, "ru-RU");
        assert_eq!(loaded.telegram.poll_timeout_secs, 60);
        assert_eq!(loaded.storage.database, Some(PathBuf::from("/tmp/watched.db")));
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let toml = r#"
            [telegram]
            token = "123:abc"

            [tmdb]
            api_key = "key"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.telegram.poll_timeout_secs, 60);
        assert_eq!(config.tmdb.language, "en-US");
        assert!(config.tmdb.base_url.is_none());
        assert!(config.storage.database.is_none());
        assert!(config.logging.file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_section_is_an_error() {
        let toml = r#"
            [telegram]
            token = "123:abc"
        "#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::template();
        assert!(config.validate().is_err());

        config.telegram.token = "123:abc".to_string();
        assert!(config.validate().is_err());

        config.tmdb.api_key = "real_key".to_string();
        assert!(config.validate().is_ok());

        config.telegram.poll_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(&dir.path().join("absent.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_replace_secrets() {
        let mut config = Config::template();
        config.apply_overrides(|key| match key {
            TELEGRAM_TOKEN_ENV => Some("999:env".to_string()),
            TMDB_API_KEY_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.telegram.token, "999:env");
        // Blank values are ignored
        assert_eq!(config.tmdb.api_key, API_KEY_PLACEHOLDER);
    }

    #[test]
    fn test_database_path_default_and_override() {
        let paths = PathManager::from_base(PathBuf::from("/srv/watchbot"));
        let mut config = Config::new("t".to_string(), "k".to_string());
        assert_eq!(config.database_path(&paths), PathBuf::from("/srv/watchbot/data/watched.db"));

        config.storage.database = Some(PathBuf::from("/var/lib/watched.db"));
        assert_eq!(config.database_path(&paths), PathBuf::from("/var/lib/watched.db"));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("abcdefgh"), "****efgh");
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret(""), "");
    }
}
