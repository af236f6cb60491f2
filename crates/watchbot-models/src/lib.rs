pub mod catalog;
pub mod conversation;
pub mod media;
pub mod message;
pub mod watched;

pub use catalog::CatalogItem;
pub use conversation::{ConversationState, PendingEntry};
pub use media::{MediaKind, ParseMediaKindError};
pub use message::{InboundMessage, OutboundMessage};
pub use watched::{NewWatchedEntry, WatchedEntry};
