//! Data model for everything the core persists.
//!
//! Records are stored as JSON strings with camelCase field names and epoch
//! millisecond timestamps, so data written by the browser client decodes
//! unchanged. Snapshots embedded in other records ([`Bookmark::entity`],
//! [`Video::tagged_entities`]) are independent copies, never references: they
//! are not refreshed or removed when the source venue changes.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::keys;

/// Kind of venue listed in the directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    WineBar,
    #[default]
    Retailer,
    Restaurant,
    Winery,
    Experience,
    Bottle,
}

impl EntityType {
    pub const ALL: [EntityType; 6] = [
        EntityType::WineBar,
        EntityType::Retailer,
        EntityType::Restaurant,
        EntityType::Winery,
        EntityType::Experience,
        EntityType::Bottle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::WineBar => "wine-bar",
            EntityType::Retailer => "retailer",
            EntityType::Restaurant => "restaurant",
            EntityType::Winery => "winery",
            EntityType::Experience => "experience",
            EntityType::Bottle => "bottle",
        }
    }

    /// Parses free text (as returned by web search) and falls back to
    /// [`EntityType::Retailer`] for anything unrecognised.
    pub fn parse_lenient(raw: &str) -> EntityType {
        let normalized = raw.trim().to_lowercase().replace([' ', '_'], "-");
        EntityType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .unwrap_or(EntityType::Retailer)
    }
}

impl Display for EntityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// A wine-related venue, stored at `entity:<country>:<id>`.
///
/// # Invariants
///
/// - `id` is unique within its country partition.
/// - The country segment of the key equals [`Entity::country`]; always derive
///   the key with [`Entity::key`].
/// - `verified == true` implies `verified_at` and `verified_by` are set.
///
/// # Examples
///
/// ```rust
/// use w1ne_core::models::{Entity, EntityType};
///
/// let entity = Entity::new("entity_ch_demo", "Cave Demo", EntityType::WineBar, "CH");
/// assert_eq!(entity.key(), "entity:CH:entity_ch_demo");
/// assert_eq!(entity.slug, "cave-demo");
///
/// let json = serde_json::to_string(&entity)?;
/// assert!(json.contains(r#""type":"wine-bar""#));
/// let decoded: Entity = serde_json::from_str(&json)?;
/// assert_eq!(decoded, entity);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    pub country: String,
    #[serde(default)]
    pub about: String,
    #[serde(default)]
    pub specialties: Vec<String>,
    #[serde(default)]
    pub contact: Contact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
    #[serde(default)]
    pub web_sourced: bool,
}

impl Entity {
    /// Minimal unverified venue; everything optional left empty.
    pub fn new(id: &str, name: &str, entity_type: EntityType, country: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            slug: slugify(name),
            entity_type,
            address: String::new(),
            lat: None,
            lng: None,
            country: country.to_string(),
            about: String::new(),
            specialties: Vec::new(),
            contact: Contact::default(),
            website_url: None,
            image_url: None,
            image_urls: Vec::new(),
            image_data: None,
            is_paid: false,
            verified: false,
            verified_at: None,
            verified_by: None,
            admin_email: None,
            added_by: None,
            added_at: None,
            updated_at: None,
            web_sourced: false,
        }
    }

    pub fn key(&self) -> String {
        keys::entity_key(&self.country, &self.id)
    }

    pub fn has_verification_provenance(&self) -> bool {
        !self.verified || (self.verified_at.is_some() && self.verified_by.is_some())
    }

    /// Case-insensitive substring match over name, address, about, type and
    /// specialty tags. `query` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query)
            || self.address.to_lowercase().contains(query)
            || self.about.to_lowercase().contains(query)
            || self.entity_type.as_str().contains(query)
            || self
                .specialties
                .iter()
                .any(|tag| tag.to_lowercase().contains(query))
    }
}

/// Lowercases `name` and collapses every run of characters outside
/// `[a-z0-9]` into a single dash.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Fields accepted when an admin creates a venue by hand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDraft {
    pub name: String,
    pub address: String,
    pub entity_type: Option<EntityType>,
    pub country: String,
    pub about: String,
    pub specialties: Vec<String>,
    pub contact: Contact,
    pub image_url: Option<String>,
    pub admin_email: Option<String>,
}

/// Partial update merged into an existing venue by `EntityRepository::save`.
/// `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub entity_type: Option<EntityType>,
    pub country: Option<String>,
    pub about: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub contact: Option<Contact>,
    pub image_url: Option<Option<String>>,
    pub admin_email: Option<Option<String>>,
}

/// Denormalized venue reference carried by a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedEntity {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub country: String,
}

impl From<&Entity> for TaggedEntity {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id.clone(),
            name: entity.name.clone(),
            entity_type: entity.entity_type,
            country: entity.country.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A post in the short-video feed, stored at `video:<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub caption: String,
    pub country: String,
    pub uploaded_by: String,
    #[serde(default)]
    pub uploaded_by_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_data: Option<String>,
    #[serde(default)]
    pub tagged_entities: Vec<TaggedEntity>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub status: VideoStatus,
    pub timestamp: i64,
    #[serde(default)]
    pub updated_at: i64,
}

/// Upload form contents. Media fields left `None` on an edit keep the
/// existing media.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoDraft {
    pub caption: String,
    pub country: String,
    pub tagged_entities: Vec<TaggedEntity>,
    pub video_data: Option<String>,
    pub thumbnail_data: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkType {
    Visit,
    Wine,
}

/// A saved venue, stored at `bookmark:<email>:<entityId>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub entity_id: String,
    #[serde(rename = "type")]
    pub bookmark_type: BookmarkType,
    /// Snapshot taken when the bookmark was saved.
    pub entity: Entity,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    #[serde(default)]
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            timestamp,
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp,
        }
    }
}

/// A persisted chat session, stored at `conversation:<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub region: String,
    pub messages: Vec<ChatMessage>,
    pub last_message_at: i64,
    pub preview: String,
}

/// Device-local signed-in user, stored under `w1ne_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub age_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl User {
    pub fn new(email: &str, created_at: i64) -> Self {
        Self {
            email: email.to_string(),
            verified: true,
            created_at,
            age_verified: false,
            region: None,
        }
    }

    /// Local part of the email, shown as the uploader name.
    pub fn display_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }

    pub fn is_admin(&self) -> bool {
        self.email.contains("admin")
    }

    pub fn is_master_admin(&self) -> bool {
        self.email.contains("admin@")
    }
}
