pub mod config;
pub mod paths;

pub use config::{
    mask_secret, Config, LoggingConfig, StorageConfig, TelegramConfig, TmdbConfig,
    TELEGRAM_TOKEN_ENV, TMDB_API_KEY_ENV,
};
pub use paths::{PathManager, container_base_path};
