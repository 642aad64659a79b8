//! Venue discovery through a generative web-search completion API.
//!
//! The model is asked for a bare JSON array of venues in one region. The
//! reply text is scanned for the outermost `[...]` so stray prose or code
//! fences around the array do not matter.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::chat_client::build_client;
use crate::entity_repository::WEB_SOURCE_AUTHOR;
use crate::error::AiError;
use crate::models::{slugify, Contact, Entity, EntityType};

const MAX_TOKENS: u32 = 2000;
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// One venue as described by the search model.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueCandidate {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, rename = "type")]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub specialties: Option<Vec<String>>,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
}

impl VenueCandidate {
    /// Unverified, web-sourced venue in `region`.
    pub fn into_entity(self, id: &str, region: &str, now: i64) -> Entity {
        let contact = self.contact.unwrap_or_default();
        let image_urls = self.image_urls.unwrap_or_default();

        let mut entity = Entity::new(
            id,
            &self.name,
            self.entity_type
                .as_deref()
                .map(EntityType::parse_lenient)
                .unwrap_or_default(),
            region,
        );
        entity.slug = slugify(&self.name);
        entity.address = self.address.unwrap_or_default();
        entity.about = self.about.unwrap_or_default();
        entity.specialties = self.specialties.unwrap_or_default();
        entity.website_url = self.website_url.or_else(|| contact.website.clone());
        entity.contact = contact;
        entity.image_url = image_urls.first().cloned();
        entity.image_urls = image_urls;
        entity.verified = false;
        entity.added_by = Some(WEB_SOURCE_AUTHOR.to_string());
        entity.added_at = Some(now);
        entity.web_sourced = true;
        entity
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VenueSearchPort: Send + Sync {
    async fn search(&self, query: &str, region: &str) -> Result<Vec<VenueCandidate>, AiError>;
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<serde_json::Value>,
    tools: Vec<serde_json::Value>,
}

#[derive(Clone)]
pub struct HttpVenueSearch {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpVenueSearch {
    pub fn new(
        endpoint: &str,
        model: &str,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, AiError> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl VenueSearchPort for HttpVenueSearch {
    async fn search(&self, query: &str, region: &str) -> Result<Vec<VenueCandidate>, AiError> {
        let body = MessagesRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            messages: vec![json!({ "role": "user", "content": search_prompt(query, region) })],
            tools: vec![json!({ "type": "web_search_20250305", "name": "web_search" })],
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request
                .header("x-api-key", key)
                .header("anthropic-version", ANTHROPIC_VERSION);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AiError::RequestFailed(format!(
                "search API answered {}",
                response.status()
            )));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;

        let text: String = body
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        debug!("Venue search returned {} chars of text", text.len());

        parse_candidates(&text)
    }
}

/// Extracts the venue array from the model's reply text.
pub fn parse_candidates(text: &str) -> Result<Vec<VenueCandidate>, AiError> {
    let json = match (text.find('['), text.rfind(']')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text.trim(),
    };

    serde_json::from_str(json).map_err(|e| {
        warn!("Failed to parse venue search reply: {e}");
        AiError::InvalidResponse(e.to_string())
    })
}

pub fn search_prompt(query: &str, region: &str) -> String {
    format!(
        r#"The user is in {region}. Find wine bars, wine shops, wineries or other wine-related places in {region} matching: "{query}".
Only return places in {region} unless the query explicitly names another location.

For each place extract the business name, full address (including city and {region}), type (wine-bar, retailer, restaurant, winery), a short description, specialties, contact details (phone, email, website), the main website URL, and 1-3 direct image URLs (jpg, png, webp) of the place. Use null for anything you cannot find.

Reply with ONLY a JSON array, no markdown and no explanation, shaped like:
[{{"name": "Business Name", "address": "Street, City, {region}", "type": "wine-bar", "about": "Description", "specialties": ["natural", "organic"], "contact": {{"phone": "+XX XXX XXX XXXX", "email": "email@domain.com", "website": "https://example.com"}}, "websiteUrl": "https://example.com", "imageUrls": ["https://example.com/image1.jpg"]}}]

If nothing in {region} matches, reply with []."#
    )
}
