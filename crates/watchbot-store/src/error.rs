use thiserror::Error;
use watchbot_models::MediaKind;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("'{title}' is not in the watched list")]
    NotFound { title: String },

    #[error("'{title}' is a {kind}, not a show")]
    WrongKind { title: String, kind: MediaKind },

    #[error("corrupt row {id}: {reason}")]
    Corrupt { id: i64, reason: String },

    #[error("database lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
