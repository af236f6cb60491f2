use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};
use watchbot_config::TelegramConfig;
use watchbot_models::{InboundMessage, OutboundMessage};

use crate::error::TransportError;
use crate::telegram::{api, DEFAULT_API_URL};
use crate::traits::ChatTransport;

// Extra time on top of the long-poll timeout before the HTTP request gives up
const POLL_GRACE_SECS: u64 = 10;

/// Telegram Bot API transport using `getUpdates` long polling.
pub struct TelegramClient {
    client: Client,
    bot_url: String,
    poll_timeout_secs: u64,
    offset: i64,
}

impl TelegramClient {
    pub fn new(token: &str, poll_timeout_secs: u64) -> Result<Self, TransportError> {
        Self::with_api_url(DEFAULT_API_URL, token, poll_timeout_secs)
    }

    pub fn with_api_url(
        api_url: &str,
        token: &str,
        poll_timeout_secs: u64,
    ) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + POLL_GRACE_SECS))
            .build()?;

        Ok(Self {
            client,
            bot_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
            poll_timeout_secs,
            offset: 0,
        })
    }

    pub fn from_config(config: &TelegramConfig) -> Result<Self, TransportError> {
        let api_url = config.api_url.as_deref().unwrap_or(DEFAULT_API_URL);
        Self::with_api_url(api_url, &config.token, config.poll_timeout_secs)
    }

    /// Next update id to request.
    pub fn offset(&self) -> i64 {
        self.offset
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn poll(&mut self) -> Result<Vec<InboundMessage>, TransportError> {
        let updates =
            api::get_updates(&self.client, &self.bot_url, self.offset, self.poll_timeout_secs)
                .await?;

        let mut messages = Vec::with_capacity(updates.len());
        for update in updates {
            // Acknowledge every update, including the ones we ignore
            self.offset = self.offset.max(update.update_id + 1);

            match update.message {
                Some(api::Message { chat, text: Some(text) }) => {
                    messages.push(InboundMessage::new(chat.id, text));
                }
                _ => {
                    debug!(update_id = update.update_id, "Skipping update without text message");
                }
            }
        }

        Ok(messages)
    }

    async fn send(&self, chat_id: i64, message: &OutboundMessage) -> Result<(), TransportError> {
        match message {
            OutboundMessage::Text { text } => self.send_text(chat_id, text).await,
            OutboundMessage::Photo { url, caption } => {
                match api::send_photo(&self.client, &self.bot_url, chat_id, url, caption).await {
                    Ok(()) => Ok(()),
                    Err(TransportError::Api { description, .. }) => {
                        // Telegram rejects some remote images; the caption still matters
                        warn!(
                            chat_id,
                            error = %description,
                            "Photo rejected, sending caption as text"
                        );
                        self.send_text(chat_id, caption).await
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }
}

impl TelegramClient {
    /// Markdown first; markup Telegram cannot parse is resent as plain text.
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), TransportError> {
        match api::send_message(&self.client, &self.bot_url, chat_id, text, true).await {
            Err(TransportError::Api { description, .. }) if api::is_parse_error(&description) => {
                warn!(chat_id, error = %description, "Markdown rejected, resending as plain text");
                api::send_message(&self.client, &self.bot_url, chat_id, text, false).await
            }
            result => result,
        }
    }
}
