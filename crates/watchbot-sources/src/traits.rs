use async_trait::async_trait;
use watchbot_models::{CatalogItem, InboundMessage, OutboundMessage};

use crate::error::{CatalogError, TransportError};

/// Read-only media catalog: free-text search plus the weekly popularity lists.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Movies and shows matching `query`, in catalog order.
    async fn search(&self, query: &str) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Current popular movies, every item tagged as a movie.
    async fn popular_movies(&self) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Current popular shows, every item tagged as a show.
    async fn popular_shows(&self) -> Result<Vec<CatalogItem>, CatalogError>;

    /// Full poster URL for an item, if it has one.
    fn poster_url(&self, item: &CatalogItem) -> Option<String>;
}

/// Inbound/outbound message plumbing for a chat service.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Wait for the next batch of text messages. May return an empty batch.
    async fn poll(&mut self) -> Result<Vec<InboundMessage>, TransportError>;

    async fn send(&self, chat_id: i64, message: &OutboundMessage) -> Result<(), TransportError>;
}
