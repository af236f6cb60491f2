use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::{debug, warn};
use watchbot_models::{MediaKind, NewWatchedEntry, WatchedEntry};

use crate::{Database, StoreError};

const SELECT_COLUMNS: &str =
    "SELECT id, title, media_type, tmdb_id, user_id, watched_at, current_episode FROM watched";

/// Row as stored; `media_type` is still text until validated.
struct WatchedRow {
    id: i64,
    title: Option<String>,
    media_type: Option<String>,
    tmdb_id: Option<i64>,
    user_id: i64,
    watched_at: DateTime<Utc>,
    current_episode: Option<i64>,
}

impl WatchedRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            media_type: row.get(2)?,
            tmdb_id: row.get(3)?,
            user_id: row.get(4)?,
            watched_at: row.get(5)?,
            current_episode: row.get(6)?,
        })
    }
}

impl TryFrom<WatchedRow> for WatchedEntry {
    type Error = StoreError;

    fn try_from(row: WatchedRow) -> Result<Self, Self::Error> {
        let kind: MediaKind = row
            .media_type
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|e| StoreError::Corrupt {
                id: row.id,
                reason: format!("{}", e),
            })?;

        let current_episode = match kind {
            MediaKind::Movie => 0,
            MediaKind::Show => {
                let raw = row.current_episode.unwrap_or(0);
                u32::try_from(raw).map_err(|_| StoreError::Corrupt {
                    id: row.id,
                    reason: format!("invalid episode number {}", raw),
                })?
            }
        };

        Ok(WatchedEntry {
            id: row.id,
            title: row.title.unwrap_or_default(),
            kind,
            catalog_id: row.tmdb_id.unwrap_or_default(),
            user_id: row.user_id,
            watched_at: row.watched_at,
            current_episode,
        })
    }
}

impl Database {
    /// Append a watched entry. Identical entries may be recorded more than once.
    pub fn record(&self, entry: &NewWatchedEntry) -> Result<WatchedEntry, StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO watched (title, media_type, tmdb_id, user_id, watched_at, current_episode) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    entry.title,
                    entry.kind.as_str(),
                    entry.catalog_id,
                    entry.user_id,
                    entry.watched_at,
                    entry.stored_episode(),
                ],
            )?;
            let id = conn.last_insert_rowid();
            debug!(id, user_id = entry.user_id, kind = %entry.kind, "Recorded watched entry");

            Ok(WatchedEntry {
                id,
                title: entry.title.clone(),
                kind: entry.kind,
                catalog_id: entry.catalog_id,
                user_id: entry.user_id,
                watched_at: entry.watched_at,
                current_episode: entry.stored_episode(),
            })
        })
    }

    /// All entries for a user, newest first. An empty list is not an error.
    ///
    /// Rows that cannot be read as an entry (an unknown kind left by older
    /// versions, a negative episode) are logged and skipped.
    pub fn list_by_user(&self, user_id: i64) -> Result<Vec<WatchedEntry>, StoreError> {
        self.with_conn(|conn| {
            let sql = format!(
                "{} WHERE user_id = ?1 ORDER BY watched_at DESC, id DESC",
                SELECT_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_id], WatchedRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            let entries = rows
                .into_iter()
                .filter_map(|row| match WatchedEntry::try_from(row) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!(user_id, error = %e, "Skipping unreadable watched row");
                        None
                    }
                })
                .collect();
            Ok(entries)
        })
    }

    /// Most recently recorded entry for this user with exactly this title.
    pub fn find_by_title(
        &self,
        user_id: i64,
        title: &str,
    ) -> Result<Option<WatchedEntry>, StoreError> {
        self.with_conn(|conn| query_latest_by_title(conn, user_id, title))
    }

    /// Overwrite the current episode of a show.
    ///
    /// When a title was recorded more than once, only the most recent row is
    /// changed.
    pub fn update_episode(
        &self,
        user_id: i64,
        title: &str,
        episode: u32,
    ) -> Result<WatchedEntry, StoreError> {
        self.with_conn(|conn| {
            let mut entry = query_latest_by_title(conn, user_id, title)?
                .ok_or_else(|| StoreError::NotFound { title: title.to_string() })?;

            if !entry.kind.is_show() {
                return Err(StoreError::WrongKind {
                    title: entry.title,
                    kind: entry.kind,
                });
            }

            conn.execute(
                "UPDATE watched SET current_episode = ?1 WHERE id = ?2",
                rusqlite::params![episode, entry.id],
            )?;
            debug!(id = entry.id, user_id, episode, "Updated current episode");

            entry.current_episode = episode;
            Ok(entry)
        })
    }
}

fn query_latest_by_title(
    conn: &Connection,
    user_id: i64,
    title: &str,
) -> Result<Option<WatchedEntry>, StoreError> {
    let sql = format!(
        "{} WHERE user_id = ?1 AND title = ?2 ORDER BY watched_at DESC, id DESC LIMIT 1",
        SELECT_COLUMNS
    );
    let row = conn
        .query_row(&sql, rusqlite::params![user_id, title], WatchedRow::from_row)
        .optional()?;

    row.map(WatchedEntry::try_from).transpose()
}
