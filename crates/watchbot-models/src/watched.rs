use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::media::MediaKind;

/// One persisted record of a user having watched a movie or show.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedEntry {
    pub id: i64,
    pub title: String,
    pub kind: MediaKind,
    pub catalog_id: i64, // TMDB id, not enforced
    pub user_id: i64,
    pub watched_at: DateTime<Utc>,
    pub current_episode: u32, // Always 0 for movies
}

/// A watched entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWatchedEntry {
    pub title: String,
    pub kind: MediaKind,
    pub catalog_id: i64,
    pub user_id: i64,
    pub watched_at: DateTime<Utc>,
    pub current_episode: u32,
}

impl NewWatchedEntry {
    pub fn movie(user_id: i64, catalog_id: i64, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: MediaKind::Movie,
            catalog_id,
            user_id,
            watched_at: Utc::now(),
            current_episode: 0,
        }
    }

    pub fn show(user_id: i64, catalog_id: i64, title: impl Into<String>, episode: u32) -> Self {
        Self {
            title: title.into(),
            kind: MediaKind::Show,
            catalog_id,
            user_id,
            watched_at: Utc::now(),
            current_episode: episode,
        }
    }

    /// Episode value to persist; movies never carry one.
    pub fn stored_episode(&self) -> u32 {
        if self.kind.is_show() {
            self.current_episode
        } else {
            0
        }
    }
}
