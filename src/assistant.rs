//! Chat assistant session and venue finder.
//!
//! Both wrap a remote call that may outlive the view that started it. Each
//! call takes the view's [`CancellationToken`]; once the token is cancelled
//! the result is discarded and nothing is applied or persisted.

use std::sync::Arc;

use log::{info, warn};
use tokio_util::sync::CancellationToken;

use crate::chat_client::ChatPort;
use crate::clock::ClockPort;
use crate::conversation_repository::ConversationRepository;
use crate::entity_repository::EntityRepository;
use crate::error::StoreError;
use crate::models::{ChatMessage, Conversation, Entity};
use crate::venue_search::VenueSearchPort;

pub const GREETING: &str =
    "Hey! What's on your mind today? Looking for a wine bar, a specific bottle, or just exploring? 🍷";
pub const FALLBACK_REPLY: &str = "Sorry, I'm having trouble connecting. Please try again!";

/// Messages sent as context with each chat request.
pub const HISTORY_WINDOW: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input, or nothing sent.
    Ignored,
    /// The view went away before the reply arrived.
    Discarded,
    Replied { content: String, fallback: bool },
}

pub struct ChatSession {
    chat: Arc<dyn ChatPort>,
    conversations: ConversationRepository,
    clock: Arc<dyn ClockPort>,
    region: String,
    messages: Vec<ChatMessage>,
    conversation_id: Option<String>,
}

impl ChatSession {
    pub fn new(
        chat: Arc<dyn ChatPort>,
        conversations: ConversationRepository,
        clock: Arc<dyn ClockPort>,
        region: &str,
    ) -> Self {
        let greeting = ChatMessage::assistant(GREETING, clock.now_millis());
        Self {
            chat,
            conversations,
            clock,
            region: region.to_string(),
            messages: vec![greeting],
            conversation_id: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Sends `text`, appends the reply (or the fallback apology) and
    /// persists the transcript, pinning the session to the stored id.
    ///
    /// A failed save is logged and the reply still returned; the next
    /// successful save writes the whole transcript.
    pub async fn send(&mut self, text: &str, cancel: &CancellationToken) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        self.messages
            .push(ChatMessage::user(text, self.clock.now_millis()));
        let window_start = self.messages.len().saturating_sub(HISTORY_WINDOW);
        let history = &self.messages[window_start..];

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return SendOutcome::Discarded,
            result = self.chat.reply(text, history) => result,
        };

        let (content, fallback) = match result {
            Ok(content) => (content, false),
            Err(e) => {
                warn!("Chat error: {e}");
                (FALLBACK_REPLY.to_string(), true)
            }
        };

        self.messages
            .push(ChatMessage::assistant(content.clone(), self.clock.now_millis()));

        let saved = self
            .conversations
            .save(self.conversation_id.as_deref(), &self.region, &self.messages)
            .await;
        match saved {
            Ok(Some(id)) => self.conversation_id = Some(id),
            Ok(None) => {}
            Err(e) => warn!("Failed to save conversation: {e}"),
        }

        SendOutcome::Replied { content, fallback }
    }

    /// Adds an assistant note to the transcript without calling the worker,
    /// e.g. to confirm a bookmark.
    pub fn note(&mut self, content: &str) {
        self.messages
            .push(ChatMessage::assistant(content, self.clock.now_millis()));
    }

    /// Continues a stored conversation; later saves overwrite it.
    pub fn resume(&mut self, conversation: Conversation) {
        self.conversation_id = Some(conversation.id);
        self.messages = conversation.messages;
    }

    /// Back to a fresh greeting; the next save mints a new id.
    pub fn start_new(&mut self) {
        self.messages = vec![ChatMessage::assistant(GREETING, self.clock.now_millis())];
        self.conversation_id = None;
    }

    /// Past conversations in this session's region.
    pub async fn history(&self) -> Result<Vec<Conversation>, StoreError> {
        self.conversations.list_for_region(&self.region).await
    }
}

pub struct VenueFinder {
    entities: EntityRepository,
    search: Arc<dyn VenueSearchPort>,
}

impl VenueFinder {
    pub fn new(entities: EntityRepository, search: Arc<dyn VenueSearchPort>) -> Self {
        Self { entities, search }
    }

    /// Local matches in `region` first; only when there are none, asks the
    /// web search and stores what it finds. Search failures yield an empty
    /// list.
    pub async fn find(
        &self,
        query: &str,
        region: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Entity>, StoreError> {
        let local = EntityRepository::search(&self.entities.list_by_country(region).await?, query);
        if !local.is_empty() {
            return Ok(local);
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Venue search for {query:?} discarded");
                return Ok(Vec::new());
            }
            result = self.search.search(query, region) => result,
        };

        match result {
            Ok(candidates) => self.entities.add_web_sourced(region, candidates).await,
            Err(e) => {
                warn!("Venue search error: {e}");
                Ok(Vec::new())
            }
        }
    }
}
