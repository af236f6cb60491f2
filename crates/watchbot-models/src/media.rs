use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discriminator between movies and TV shows, both for catalog results and
/// for stored watch entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Show,
}

impl MediaKind {
    /// Value stored in the `media_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Show => "show",
        }
    }

    /// Map a TMDB `media_type` tag. TMDB calls shows "tv"; anything that is
    /// neither a movie nor a show (people, collections) yields `None`.
    pub fn from_tmdb(media_type: &str) -> Option<Self> {
        match media_type {
            "movie" => Some(MediaKind::Movie),
            "tv" => Some(MediaKind::Show),
            _ => None,
        }
    }

    pub fn is_show(&self) -> bool {
        matches!(self, MediaKind::Show)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMediaKindError(pub String);

impl fmt::Display for ParseMediaKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown media kind: {}", self.0)
    }
}

impl std::error::Error for ParseMediaKindError {}

impl FromStr for MediaKind {
    type Err = ParseMediaKindError;

    // "tv" is accepted so rows written with TMDB's own tag still load
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaKind::Movie),
            "show" | "tv" => Ok(MediaKind::Show),
            other => Err(ParseMediaKindError(other.to_string())),
        }
    }
}
