//! The single owning handle views receive.
//!
//! Holds one store and hands out repositories, the session and the AI-backed
//! services that share it.

use std::sync::Arc;

use crate::admin::AdminConsole;
use crate::assistant::{ChatSession, VenueFinder};
use crate::bookmark_repository::BookmarkRepository;
use crate::chat_client::{ChatPort, HttpChatClient};
use crate::clock::{ClockPort, RandomPort, SystemClock, SystemRandom};
use crate::config::Config;
use crate::conversation_repository::ConversationRepository;
use crate::entity_repository::EntityRepository;
use crate::error::{AiError, StoreError};
use crate::kv_store::KeyValueStore;
use crate::lmdb_store::LmdbStore;
use crate::memory_store::MemoryStore;
use crate::session::SessionStore;
use crate::venue_search::{HttpVenueSearch, VenueSearchPort};
use crate::video_repository::VideoRepository;

#[derive(Clone)]
pub struct W1neContext {
    pub store: Arc<dyn KeyValueStore>,
    pub session: SessionStore,
    pub entities: EntityRepository,
    pub videos: VideoRepository,
    pub bookmarks: BookmarkRepository,
    pub conversations: ConversationRepository,
    clock: Arc<dyn ClockPort>,
}

impl W1neContext {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            session: SessionStore::new(store.clone(), clock.clone()),
            entities: EntityRepository::new(store.clone(), clock.clone(), random.clone()),
            videos: VideoRepository::new(store.clone(), clock.clone(), random),
            bookmarks: BookmarkRepository::new(store.clone(), clock.clone()),
            conversations: ConversationRepository::new(store.clone(), clock.clone()),
            store,
            clock,
        }
    }

    /// Context over a persistent LMDB store named by `config.db_name`.
    pub fn open(config: &Config) -> Result<Self, StoreError> {
        let store = LmdbStore::init(&config.db_name)?;
        Ok(Self::new(
            Arc::new(store),
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
        ))
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(SystemClock::new()),
            Arc::new(SystemRandom::new()),
        )
    }

    pub fn admin(&self) -> AdminConsole {
        AdminConsole::new(self.entities.clone(), self.videos.clone())
    }

    pub fn chat_session(&self, chat: Arc<dyn ChatPort>, region: &str) -> ChatSession {
        ChatSession::new(chat, self.conversations.clone(), self.clock.clone(), region)
    }

    pub fn venue_finder(&self, search: Arc<dyn VenueSearchPort>) -> VenueFinder {
        VenueFinder::new(self.entities.clone(), search)
    }
}

/// HTTP clients for both AI endpoints, built from `config`.
pub fn http_clients(config: &Config) -> Result<(Arc<dyn ChatPort>, Arc<dyn VenueSearchPort>), AiError> {
    let chat = HttpChatClient::new(&config.chat_endpoint, config.request_timeout)?;
    let search = HttpVenueSearch::new(
        &config.search_endpoint,
        &config.search_model,
        config.search_api_key.clone(),
        config.request_timeout,
    )?;
    Ok((Arc::new(chat), Arc::new(search)))
}
