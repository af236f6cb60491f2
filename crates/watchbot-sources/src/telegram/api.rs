use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TransportError;

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Serialize)]
struct GetUpdates<'a> {
    offset: i64,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parse_mode: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct SendPhoto<'a> {
    chat_id: i64,
    photo: &'a str,
    caption: &'a str,
    parse_mode: &'a str,
}

const PARSE_MODE: &str = "Markdown";

/// Whether an API error description is Telegram rejecting the Markdown markup.
pub fn is_parse_error(description: &str) -> bool {
    description.contains("can't parse entities")
}

async fn call<B, T>(
    client: &Client,
    bot_url: &str,
    method: &str,
    body: &B,
) -> Result<T, TransportError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let response = client
        .post(format!("{}/{}", bot_url, method))
        .json(body)
        .send()
        .await?;

    // Bot API errors come back as JSON with ok=false, whatever the HTTP status
    let status = response.status();
    let text = response.text().await?;
    let envelope: ApiResponse<T> = match serde_json::from_str(&text) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => return Err(TransportError::Decode(e)),
        Err(_) => {
            return Err(TransportError::Api {
                code: Some(i64::from(status.as_u16())),
                description: text,
            })
        }
    };

    if !envelope.ok {
        return Err(TransportError::Api {
            code: envelope.error_code,
            description: envelope.description.unwrap_or_else(|| "unknown error".to_string()),
        });
    }

    envelope.result.ok_or_else(|| TransportError::Api {
        code: None,
        description: format!("{} returned no result", method),
    })
}

/// Long-poll for updates newer than `offset`.
pub async fn get_updates(
    client: &Client,
    bot_url: &str,
    offset: i64,
    timeout_secs: u64,
) -> Result<Vec<Update>, TransportError> {
    let body = GetUpdates {
        offset,
        timeout: timeout_secs,
        allowed_updates: &["message"],
    };
    let updates: Vec<Update> = call(client, bot_url, "getUpdates", &body).await?;
    debug!(offset, count = updates.len(), "Fetched updates");
    Ok(updates)
}

/// Send `text`, as Markdown unless `markdown` is false.
pub async fn send_message(
    client: &Client,
    bot_url: &str,
    chat_id: i64,
    text: &str,
    markdown: bool,
) -> Result<(), TransportError> {
    let body = SendMessage {
        chat_id,
        text,
        parse_mode: markdown.then_some(PARSE_MODE),
    };
    let _: serde_json::Value = call(client, bot_url, "sendMessage", &body).await?;
    Ok(())
}

pub async fn send_photo(
    client: &Client,
    bot_url: &str,
    chat_id: i64,
    photo_url: &str,
    caption: &str,
) -> Result<(), TransportError> {
    let body = SendPhoto {
        chat_id,
        photo: photo_url,
        caption,
        parse_mode: PARSE_MODE,
    };
    let _: serde_json::Value = call(client, bot_url, "sendPhoto", &body).await?;
    Ok(())
}
