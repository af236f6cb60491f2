use serde::{Deserialize, Serialize};

/// A text message received from the chat transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub text: String,
}

impl InboundMessage {
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }
}

/// A reply to send back. Both shapes are Markdown formatted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutboundMessage {
    Text { text: String },
    Photo { url: String, caption: String },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutboundMessage::Text { text: text.into() }
    }

    pub fn photo(url: impl Into<String>, caption: impl Into<String>) -> Self {
        OutboundMessage::Photo {
            url: url.into(),
            caption: caption.into(),
        }
    }

    /// The visible text, whether it is a message body or a photo caption.
    pub fn body(&self) -> &str {
        match self {
            OutboundMessage::Text { text } => text,
            OutboundMessage::Photo { caption, .. } => caption,
        }
    }
}
