pub mod error;
pub mod telegram;
pub mod tmdb;
pub mod traits;

pub use error::{CatalogError, TransportError};
pub use telegram::TelegramClient;
pub use tmdb::TmdbClient;
pub use traits::{Catalog, ChatTransport};
