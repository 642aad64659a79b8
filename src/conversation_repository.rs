//! Chat history under `conversation:<id>`, filtered by region on read.

use std::sync::Arc;

use log::debug;

use crate::clock::ClockPort;
use crate::error::StoreError;
use crate::keys::{self, CONVERSATION_PREFIX};
use crate::kv_store::{load_json, load_prefix, save_json, KeyValueStore};
use crate::models::{ChatMessage, ChatRole, Conversation};

const PREVIEW_CHARS: usize = 60;
const EMPTY_PREVIEW: &str = "New conversation";

#[derive(Clone)]
pub struct ConversationRepository {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn ClockPort>,
}

impl ConversationRepository {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    /// Conversations held in `region`, most recent activity first.
    pub async fn list_for_region(&self, region: &str) -> Result<Vec<Conversation>, StoreError> {
        let mut conversations: Vec<Conversation> =
            load_prefix(self.store.as_ref(), CONVERSATION_PREFIX).await?;
        conversations.retain(|c| c.region == region);
        conversations.sort_by(|a, b| b.last_message_at.cmp(&a.last_message_at));
        Ok(conversations)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Conversation>, StoreError> {
        load_json(self.store.as_ref(), &keys::conversation_key(id)).await
    }

    /// Persists the transcript and returns the id it was stored under; pass
    /// that id back on the next save. A transcript without any user message
    /// (just the greeting) is not stored and yields `None`.
    pub async fn save(
        &self,
        id: Option<&str>,
        region: &str,
        messages: &[ChatMessage],
    ) -> Result<Option<String>, StoreError> {
        let Some(first_user) = messages.iter().find(|m| m.role == ChatRole::User) else {
            debug!("Skipping save of greeting-only conversation");
            return Ok(None);
        };

        let now = self.clock.now_millis();
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| format!("conversation_{now}"));

        let preview: String = first_user.content.chars().take(PREVIEW_CHARS).collect();
        let conversation = Conversation {
            id: id.clone(),
            region: region.to_string(),
            messages: messages.to_vec(),
            last_message_at: now,
            preview: if preview.is_empty() {
                EMPTY_PREVIEW.to_string()
            } else {
                preview
            },
        };

        save_json(self.store.as_ref(), &keys::conversation_key(&id), &conversation).await?;
        Ok(Some(id))
    }
}
