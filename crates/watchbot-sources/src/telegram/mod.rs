pub mod api;
pub mod client;

pub use client::TelegramClient;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";
