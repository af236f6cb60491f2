use serde::{Deserialize, Serialize};
use crate::media::MediaKind;

/// A movie or show as reported by the external catalog. Never stored;
/// fetched fresh for every request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: i64,
    pub title: String, // `title` for movies, `name` for shows
    pub kind: MediaKind,
    pub date: String, // `release_date` or `first_air_date`, may be empty
    pub overview: String,
    pub poster_path: Option<String>,
    pub popularity: f64,
}
