pub mod command;
pub mod dispatcher;
pub mod format;
pub mod ranking;
pub mod session;

pub use command::{Command, UpdateRequest, UsageError, parse_episode};
pub use dispatcher::{Dispatcher, SEARCH_LIMIT, TOP_LIMIT};
pub use ranking::rank_by_popularity;
pub use session::{InMemorySessionStore, SessionStore};
