use std::sync::Arc;
use tracing::{debug, error, info, warn};
use watchbot_models::{
    CatalogItem, ConversationState, InboundMessage, MediaKind, NewWatchedEntry, OutboundMessage,
    PendingEntry,
};
use watchbot_sources::Catalog;
use watchbot_store::{Database, StoreError};

use crate::command::{parse_episode, Command, UpdateRequest, UsageError};
use crate::format;
use crate::ranking::rank_by_popularity;
use crate::session::SessionStore;

/// Results shown for `/search`
pub const SEARCH_LIMIT: usize = 5;
/// Results shown for `/top`
pub const TOP_LIMIT: usize = 20;

/// Routes inbound chat messages to handlers and produces the replies.
///
/// A pending conversation for the sender takes priority over command
/// matching. Handlers never fail: every error becomes a reply and a log line.
pub struct Dispatcher<C, S> {
    catalog: Arc<C>,
    store: Arc<Database>,
    sessions: S,
}

impl<C, S> Dispatcher<C, S>
where
    C: Catalog,
    S: SessionStore,
{
    pub fn new(catalog: Arc<C>, store: Arc<Database>, sessions: S) -> Self {
        Self {
            catalog,
            store,
            sessions,
        }
    }

    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    pub async fn handle(&self, message: &InboundMessage) -> Vec<OutboundMessage> {
        let chat_id = message.chat_id;

        if let Some(ConversationState::AwaitingEpisode(pending)) = self.sessions.get(chat_id) {
            debug!(chat_id, title = %pending.title, "Treating message as episode answer");
            return self.handle_episode_answer(chat_id, &message.text, pending).await;
        }

        let command = Command::parse(&message.text);
        debug!(chat_id, command = command.name(), "Dispatching command");

        match command {
            Command::Start => vec![OutboundMessage::text(format::HELP)],
            Command::Add(query) => self.handle_add(chat_id, &query).await,
            Command::List => self.handle_list(chat_id),
            Command::Search(query) => self.handle_search(chat_id, &query).await,
            Command::Top => self.handle_top(chat_id).await,
            Command::Update(args) => self.handle_update(chat_id, &args),
            Command::Unknown(_) => vec![OutboundMessage::text(format::UNKNOWN_COMMAND)],
        }
    }

    async fn handle_add(&self, chat_id: i64, query: &str) -> Vec<OutboundMessage> {
        if query.is_empty() {
            return vec![OutboundMessage::text(format::ADD_USAGE)];
        }

        let Some(first) = self.search(chat_id, query).await.into_iter().next() else {
            return vec![OutboundMessage::text(format::nothing_found(query))];
        };

        match first.kind {
            MediaKind::Show => {
                info!(
                    chat_id,
                    catalog_id = first.id,
                    title = %first.title,
                    "Show matched, awaiting episode"
                );
                let prompt = format::episode_prompt(&first.title);
                self.sessions.set(
                    chat_id,
                    ConversationState::AwaitingEpisode(PendingEntry {
                        catalog_id: first.id,
                        title: first.title,
                        kind: first.kind,
                    }),
                );
                vec![OutboundMessage::text(prompt)]
            }
            MediaKind::Movie => {
                let entry = NewWatchedEntry::movie(chat_id, first.id, first.title.clone());
                match self.store.record(&entry) {
                    Ok(recorded) => {
                        info!(chat_id, id = recorded.id, title = %recorded.title, "Movie recorded");
                        vec![self.with_poster(&first, format::added_movie(&first.title))]
                    }
                    Err(e) => {
                        error!(chat_id, operation = "record", error = %e, "Failed to record movie");
                        vec![OutboundMessage::text(format::SAVE_FAILED)]
                    }
                }
            }
        }
    }

    async fn handle_episode_answer(
        &self,
        chat_id: i64,
        text: &str,
        pending: PendingEntry,
    ) -> Vec<OutboundMessage> {
        let Some(episode) = parse_episode(text) else {
            debug!(chat_id, "Invalid episode answer, prompting again");
            return vec![OutboundMessage::text(format::invalid_episode(&pending.title))];
        };

        let entry =
            NewWatchedEntry::show(chat_id, pending.catalog_id, pending.title.clone(), episode);
        if let Err(e) = self.store.record(&entry) {
            // Leave the conversation pending so the user can answer again
            error!(chat_id, operation = "record", error = %e, "Failed to record show");
            return vec![OutboundMessage::text(format::SAVE_FAILED)];
        }

        self.sessions.clear(chat_id);
        info!(chat_id, catalog_id = pending.catalog_id, episode, "Show recorded");

        let confirmation = format::added_show(&pending.title, episode);
        match self.poster_for(&pending).await {
            Some(url) => vec![OutboundMessage::photo(url, confirmation)],
            None => vec![OutboundMessage::text(confirmation)],
        }
    }

    /// Best-effort poster lookup for a pending show. Failures only cost the picture.
    async fn poster_for(&self, pending: &PendingEntry) -> Option<String> {
        match self.catalog.search(&pending.title).await {
            Ok(results) => results
                .first()
                .filter(|item| item.id == pending.catalog_id)
                .and_then(|item| self.catalog.poster_url(item)),
            Err(e) => {
                warn!(catalog_id = pending.catalog_id, error = %e, "Poster lookup failed");
                None
            }
        }
    }

    fn handle_list(&self, chat_id: i64) -> Vec<OutboundMessage> {
        match self.store.list_by_user(chat_id) {
            Ok(entries) if entries.is_empty() => vec![OutboundMessage::text(format::LIST_EMPTY)],
            Ok(entries) => vec![OutboundMessage::text(format::watched_list(&entries))],
            Err(e) => {
                error!(chat_id, operation = "list", error = %e, "Failed to list watched entries");
                vec![OutboundMessage::text(format::LIST_FAILED)]
            }
        }
    }

    async fn handle_search(&self, chat_id: i64, query: &str) -> Vec<OutboundMessage> {
        if query.is_empty() {
            return vec![OutboundMessage::text(format::SEARCH_USAGE)];
        }

        let results = self.search(chat_id, query).await;
        if results.is_empty() {
            return vec![OutboundMessage::text(format::nothing_found(query))];
        }

        results
            .iter()
            .take(SEARCH_LIMIT)
            .enumerate()
            .map(|(i, item)| self.item_message(i + 1, item))
            .collect()
    }

    async fn handle_top(&self, chat_id: i64) -> Vec<OutboundMessage> {
        let mut merged = match self.catalog.popular_movies().await {
            Ok(movies) => movies,
            Err(e) => {
                warn!(chat_id, operation = "popular_movies", error = %e, "Catalog request failed");
                return vec![OutboundMessage::text(format::TOP_MOVIES_FAILED)];
            }
        };

        match self.catalog.popular_shows().await {
            Ok(shows) => merged.extend(shows),
            Err(e) => {
                warn!(chat_id, operation = "popular_shows", error = %e, "Catalog request failed");
                return vec![OutboundMessage::text(format::TOP_SHOWS_FAILED)];
            }
        }

        if merged.is_empty() {
            return vec![OutboundMessage::text(format::TOP_EMPTY)];
        }

        rank_by_popularity(merged, TOP_LIMIT)
            .iter()
            .enumerate()
            .map(|(i, item)| self.item_message(i + 1, item))
            .collect()
    }

    fn handle_update(&self, chat_id: i64, args: &str) -> Vec<OutboundMessage> {
        let request = match UpdateRequest::parse(args) {
            Ok(request) => request,
            Err(UsageError::MissingArguments) => {
                return vec![OutboundMessage::text(format::UPDATE_USAGE)]
            }
            Err(UsageError::InvalidEpisode) => {
                return vec![OutboundMessage::text(format::UPDATE_INVALID_EPISODE)]
            }
        };

        let reply = match self.store.update_episode(chat_id, &request.title, request.episode) {
            Ok(entry) => {
                info!(chat_id, id = entry.id, episode = entry.current_episode, "Episode updated");
                format::episode_updated(&entry.title, entry.current_episode)
            }
            Err(StoreError::NotFound { .. }) => format::not_in_list(&request.title),
            Err(StoreError::WrongKind { .. }) => format::NOT_A_SHOW.to_string(),
            Err(e) => {
                error!(
                    chat_id,
                    operation = "update_episode",
                    error = %e,
                    "Failed to update episode"
                );
                format::UPDATE_FAILED.to_string()
            }
        };
        vec![OutboundMessage::text(reply)]
    }

    /// Catalog search where a failure reads the same as no results.
    async fn search(&self, chat_id: i64, query: &str) -> Vec<CatalogItem> {
        match self.catalog.search(query).await {
            Ok(results) => results,
            Err(e) => {
                warn!(chat_id, operation = "search", error = %e, "Catalog search failed");
                Vec::new()
            }
        }
    }

    fn item_message(&self, rank: usize, item: &CatalogItem) -> OutboundMessage {
        self.with_poster(item, format::catalog_caption(rank, item))
    }

    fn with_poster(&self, item: &CatalogItem, text: String) -> OutboundMessage {
        match self.catalog.poster_url(item) {
            Some(url) => OutboundMessage::photo(url, text),
            None => OutboundMessage::text(text),
        }
    }
}
