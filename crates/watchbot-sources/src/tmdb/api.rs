use reqwest::Client;
use serde::{Deserialize, Deserializer};
use tracing::debug;
use watchbot_models::{CatalogItem, MediaKind};

use crate::error::CatalogError;

/// A page of results from any TMDB listing or search endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct TmdbPage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<TmdbResult>,
}

/// One result entry. Movies carry `title`/`release_date`, shows carry
/// `name`/`first_air_date`; everything is optional on the wire.
#[derive(Debug, Default, Deserialize)]
pub struct TmdbResult {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub media_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_air_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub popularity: f64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TmdbResult {
    /// Kind as reported by the API; `None` for people and other non-media results.
    pub fn reported_kind(&self) -> Option<MediaKind> {
        MediaKind::from_tmdb(&self.media_type)
    }

    /// Convert to the uniform result shape, treating the entry as `kind`.
    pub fn into_item(self, kind: MediaKind) -> CatalogItem {
        let (title, date) = match kind {
            MediaKind::Movie => (
                prefer(self.title, self.name),
                prefer(self.release_date, self.first_air_date),
            ),
            MediaKind::Show => (
                prefer(self.name, self.title),
                prefer(self.first_air_date, self.release_date),
            ),
        };

        CatalogItem {
            id: self.id,
            title,
            kind,
            date,
            overview: self.overview,
            poster_path: self.poster_path.filter(|p| !p.trim().is_empty()),
            popularity: self.popularity,
        }
    }
}

fn prefer(primary: String, fallback: String) -> String {
    if primary.is_empty() {
        fallback
    } else {
        primary
    }
}

/// GET a TMDB endpoint and decode the result page.
pub async fn fetch_page(
    client: &Client,
    url: &str,
    endpoint: &str,
) -> Result<TmdbPage, CatalogError> {
    debug!(endpoint, "TMDB request");

    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(CatalogError::Status {
            status: status.as_u16(),
            body: error_text,
        });
    }

    let body = response.text().await?;
    let page: TmdbPage = serde_json::from_str(&body)?;
    debug!(endpoint, results = page.results.len(), "TMDB response decoded");
    Ok(page)
}

/// Keep movie and show results in order, dropping everything else.
pub fn media_results(page: TmdbPage) -> Vec<CatalogItem> {
    page.results
        .into_iter()
        .filter_map(|result| {
            let kind = result.reported_kind()?;
            Some(result.into_item(kind))
        })
        .collect()
}

/// Tag every result with `kind`, whatever the API says.
pub fn stamped_results(page: TmdbPage, kind: MediaKind) -> Vec<CatalogItem> {
    page.results
        .into_iter()
        .map(|result| result.into_item(kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(json: serde_json::Value) -> TmdbPage {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_decode_is_permissive() {
        let page = page(serde_json::json!({
            "page": 1,
            "total_pages": 3,
            "results": [
                {"id": 1, "media_type": "movie", "title": null, "overview": null, "poster_path": null, "adult": false},
                {"id": 2}
            ]
        }));
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].title, "");
        assert_eq!(page.results[0].poster_path, None);
        assert_eq!(page.results[1].popularity, 0.0);
        assert_eq!(page.results[1].media_type, "");
    }

    #[test]
    fn test_missing_results_is_empty() {
        let page = page(serde_json::json!({"page": 1}));
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_media_results_pick_fields_by_kind() {
        let page = page(serde_json::json!({
            "results": [
                {"id": 1396, "media_type": "tv", "name": "Breaking Bad", "first_air_date": "2008-01-20", "poster_path": "/bb.jpg", "popularity": 300.5},
                {"id": 17419, "media_type": "person", "name": "Bryan Cranston"},
                {"id": 27205, "media_type": "movie", "title": "Inception", "release_date": "2010-07-15", "poster_path": ""}
            ]
        }));

        let items = media_results(page);
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].kind, MediaKind::Show);
        assert_eq!(items[0].title, "Breaking Bad");
        assert_eq!(items[0].date, "2008-01-20");
        assert_eq!(items[0].poster_path.as_deref(), Some("/bb.jpg"));

        assert_eq!(items[1].kind, MediaKind::Movie);
        assert_eq!(items[1].title, "Inception");
        assert_eq!(items[1].date, "2010-07-15");
        assert_eq!(items[1].poster_path, None);
    }

    #[test]
    fn test_stamped_results_override_reported_kind() {
        let page = page(serde_json::json!({
            "results": [
                {"id": 1, "media_type": "movie", "name": "Severance", "first_air_date": "2022-02-18"},
                {"id": 2, "name": "Andor"}
            ]
        }));

        let items = stamped_results(page, MediaKind::Show);
        assert!(items.iter().all(|i| i.kind == MediaKind::Show));
        assert_eq!(items[0].title, "Severance");
        assert_eq!(items[0].date, "2022-02-18");
        assert_eq!(items[1].title, "Andor");
    }
}
