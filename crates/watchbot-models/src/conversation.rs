use serde::{Deserialize, Serialize};
use crate::media::MediaKind;

/// The catalog match a user is completing with a follow-up answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PendingEntry {
    pub catalog_id: i64,
    pub title: String,
    pub kind: MediaKind,
}

/// Transient per-user state for the two-step `/add` flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ConversationState {
    /// A show was matched and the bot asked for the last watched episode.
    AwaitingEpisode(PendingEntry),
}
