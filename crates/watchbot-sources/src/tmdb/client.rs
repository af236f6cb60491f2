use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use urlencoding::encode;
use watchbot_config::TmdbConfig;
use watchbot_models::{CatalogItem, MediaKind};

use crate::error::CatalogError;
use crate::tmdb::{api, DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL, POSTER_SIZE};
use crate::traits::Catalog;

/// TMDB catalog client. Requests carry no timeout; a slow catalog only
/// stalls the message being handled.
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    language: String,
    base_url: String,
    image_base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: String, language: String) -> Result<Self, CatalogError> {
        if api_key.trim().is_empty() {
            return Err(CatalogError::NotConfigured("TMDB API key is required".to_string()));
        }

        Ok(Self {
            client: Client::new(),
            api_key,
            language,
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
        })
    }

    pub fn from_config(config: &TmdbConfig) -> Result<Self, CatalogError> {
        let mut client = Self::new(config.api_key.clone(), config.language.clone())?;
        if let Some(base_url) = &config.base_url {
            client = client.with_base_url(base_url);
        }
        if let Some(image_base_url) = &config.image_base_url {
            client.image_base_url = image_base_url.trim_end_matches('/').to_string();
        }
        Ok(client)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint_url(&self, path: &str, query: Option<&str>) -> String {
        let mut url = format!(
            "{}{}?api_key={}&language={}",
            self.base_url,
            path,
            encode(&self.api_key),
            encode(&self.language)
        );
        if let Some(query) = query {
            url.push_str(&format!("&query={}", encode(query)));
        }
        url
    }

    async fn popular(&self, path: &str, kind: MediaKind) -> Result<Vec<CatalogItem>, CatalogError> {
        let url = self.endpoint_url(path, None);
        let page = api::fetch_page(&self.client, &url, path).await?;
        Ok(api::stamped_results(page, kind))
    }
}

#[async_trait]
impl Catalog for TmdbClient {
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, CatalogError> {
        debug!(query, "Searching TMDB");
        let url = self.endpoint_url("/search/multi", Some(query));
        let page = api::fetch_page(&self.client, &url, "/search/multi").await?;
        Ok(api::media_results(page))
    }

    async fn popular_movies(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        self.popular("/movie/popular", MediaKind::Movie).await
    }

    async fn popular_shows(&self) -> Result<Vec<CatalogItem>, CatalogError> {
        self.popular("/tv/popular", MediaKind::Show).await
    }

    fn poster_url(&self, item: &CatalogItem) -> Option<String> {
        item.poster_path
            .as_ref()
            .map(|path| format!("{}/{}{}", self.image_base_url, POSTER_SIZE, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> TmdbClient {
        TmdbClient::new("test-key".to_string(), "en-US".to_string())
            .unwrap()
            .with_base_url(&server.uri())
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = TmdbClient::new("  ".to_string(), "en-US".to_string());
        assert!(matches!(result, Err(CatalogError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_search_sends_encoded_query() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;

        Mock::given(method("GET"))
            .and(path("/search/multi"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("query", "Breaking Bad & co"))
            .and(query_param("language", "en-US"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {"id": 1396, "media_type": "tv", "name": "Breaking Bad", "popularity": 310.2},
                    {"id": 17419, "media_type": "person", "name": "Bryan Cranston"}
                ]
            })))
            .mount(&server)
            .await;

        let results = client.search("Breaking Bad & co").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 1396);
        assert_eq!(results[0].kind, MediaKind::Show);
    }

    #[tokio::test]
    async fn test_popular_lists_are_stamped() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;

        Mock::given(method("GET"))
            .and(path("/movie/popular"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{"id": 1, "title": "Dune", "popularity": 50.0}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/tv/popular"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{"id": 2, "name": "Shogun", "media_type": "movie", "popularity": 80.0}]
            })))
            .mount(&server)
            .await;

        let movies = client.popular_movies().await.unwrap();
        assert_eq!(movies[0].kind, MediaKind::Movie);
        assert_eq!(movies[0].title, "Dune");

        let shows = client.popular_shows().await.unwrap();
        assert_eq!(shows[0].kind, MediaKind::Show);
        assert_eq!(shows[0].title, "Shogun");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;

        Mock::given(method("GET"))
            .and(path("/search/multi"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&server)
            .await;

        let err = client.search("anything").await.unwrap_err();
        match err {
            CatalogError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "Invalid API key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;

        Mock::given(method("GET"))
            .and(path("/movie/popular"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client.popular_movies().await.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let client = TmdbClient::new("test-key".to_string(), "en-US".to_string())
            .unwrap()
            .with_base_url("http://127.0.0.1:9");

        let err = client.search("anything").await.unwrap_err();
        assert!(matches!(err, CatalogError::Network(_)));
    }

    #[test]
    fn test_poster_url() {
        let client = TmdbClient::new("k".to_string(), "en-US".to_string()).unwrap();
        let mut item = CatalogItem {
            id: 1,
            title: "Inception".to_string(),
            kind: MediaKind::Movie,
            date: String::new(),
            overview: String::new(),
            poster_path: Some("/poster.jpg".to_string()),
            popularity: 1.0,
        };
        assert_eq!(
            client.poster_url(&item).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/poster.jpg")
        );

        item.poster_path = None;
        assert_eq!(client.poster_url(&item), None);
    }
}
