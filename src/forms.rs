//! Form validation. Rejected input never reaches the store.

use crate::error::ValidationError;
use crate::models::{Contact, Entity, EntityDraft, EntityPatch, EntityType, TaggedEntity, VideoDraft};

pub const MAX_VIDEO_BYTES: u64 = 50 * 1024 * 1024;
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Image,
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_media_size(kind: MediaKind, bytes: u64) -> Result<(), ValidationError> {
    let (limit, label) = match kind {
        MediaKind::Video => (MAX_VIDEO_BYTES, "Video"),
        MediaKind::Image => (MAX_IMAGE_BYTES, "Image"),
    };
    if bytes > limit {
        return Err(ValidationError::MediaTooLarge {
            kind: label,
            limit_mb: limit / (1024 * 1024),
        });
    }
    Ok(())
}

/// Splits comma-separated tags, trimming and dropping blanks.
pub fn parse_specialties(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn required(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Raw text of the admin "edit venue" form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityForm {
    pub name: String,
    pub address: String,
    pub entity_type: EntityType,
    pub about: String,
    pub image_url: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub specialties: String,
    pub admin_email: String,
}

impl EntityForm {
    /// Pre-fills the form from a stored venue.
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            name: entity.name.clone(),
            address: entity.address.clone(),
            entity_type: entity.entity_type,
            about: entity.about.clone(),
            image_url: entity.image_url.clone().unwrap_or_default(),
            phone: entity.contact.phone.clone().unwrap_or_default(),
            email: entity.contact.email.clone().unwrap_or_default(),
            website: entity.contact.website.clone().unwrap_or_default(),
            specialties: entity.specialties.join(", "),
            admin_email: entity.admin_email.clone().unwrap_or_default(),
        }
    }

    pub fn into_patch(self) -> Result<EntityPatch, ValidationError> {
        required(&self.name, "name")?;
        required(&self.address, "address")?;

        Ok(EntityPatch {
            name: Some(self.name.trim().to_string()),
            address: Some(self.address.trim().to_string()),
            entity_type: Some(self.entity_type),
            country: None,
            about: Some(self.about.trim().to_string()),
            specialties: Some(parse_specialties(&self.specialties)),
            contact: Some(Contact {
                phone: optional(&self.phone),
                email: optional(&self.email),
                website: optional(&self.website),
            }),
            image_url: Some(optional(&self.image_url)),
            admin_email: Some(optional(&self.admin_email)),
        })
    }
}

impl EntityDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        required(&self.name, "name")?;
        required(&self.address, "address")?;
        required(&self.country, "country")?;
        Ok(())
    }
}

impl VideoDraft {
    /// New uploads need media; edits may keep the stored media.
    pub fn validate(&self, editing: bool) -> Result<(), ValidationError> {
        required(&self.caption, "caption")?;
        required(&self.country, "country")?;
        if !editing && self.video_data.is_none() && self.thumbnail_data.is_none() {
            return Err(ValidationError::MissingMedia);
        }
        Ok(())
    }

    /// Tags `entity`, or untags it if it is already tagged.
    pub fn toggle_tag(&mut self, entity: &Entity) {
        if let Some(pos) = self.tagged_entities.iter().position(|t| t.id == entity.id) {
            self.tagged_entities.remove(pos);
        } else {
            self.tagged_entities.push(TaggedEntity::from(entity));
        }
    }
}
